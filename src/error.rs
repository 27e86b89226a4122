//! Application error types.

use thiserror::Error;

/// Application-level errors for GraphRAG.
#[derive(Error, Debug)]
pub enum AppError {
    // Connection errors
    #[error("Failed to connect to {store}: {reason}")]
    Connection { store: &'static str, reason: String },

    #[error("Not connected to {0}")]
    NotConnected(&'static str),

    // Neo4j errors
    #[error("Neo4j error: {0}")]
    Neo4j(#[from] neo4rs::Error),

    #[error("Neo4j query error: {message}")]
    Query { message: String, query: String },

    #[error("Refusing to run generated Cypher containing write clauses ({clauses}): {query}")]
    UnsafeCypher { clauses: String, query: String },

    #[error("Cypher parse error: {0}")]
    CypherParse(#[from] crate::graph::ParseError),

    // Milvus errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Milvus error (code {code}): {message}")]
    VectorStore { code: i64, message: String },

    #[error("Collection already exists: {0}")]
    CollectionExists(String),

    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    // Model errors
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("LLM request failed: {0}")]
    Llm(String),

    #[error("Validation error: {0}")]
    Validation(String),

    // Config errors
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Builds a [`AppError::Connection`] for the named store.
    pub fn connection(store: &'static str, reason: impl std::fmt::Display) -> Self {
        Self::Connection {
            store,
            reason: reason.to_string(),
        }
    }
}
