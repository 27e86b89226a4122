//! Core traits for graph database abstraction.
//!
//! - [`CypherExecutor`] - Execute Cypher statements
//! - [`GraphClient`] - Connection lifecycle (health check, close)

use async_trait::async_trait;

use crate::error::AppError;
use crate::graph::row::{Params, RowStream};

/// Executes Cypher queries against a graph database.
///
/// This is the core trait that all graph backends must implement.
/// It provides methods for executing queries that return results
/// and queries that don't (schema statements, mutations).
#[async_trait]
pub trait CypherExecutor: Send + Sync {
    /// Executes a Cypher query and returns a stream of result rows.
    ///
    /// Use this for queries that return data (MATCH, RETURN, CALL ... YIELD).
    ///
    /// # Arguments
    ///
    /// * `cypher` - The Cypher query string
    /// * `params` - Parameters to bind to the query
    async fn execute_cypher(&self, cypher: &str, params: Params)
        -> Result<RowStream<'_>, AppError>;

    /// Executes a Cypher query without returning results.
    ///
    /// Use this for schema statements and mutations (CREATE CONSTRAINT, MERGE).
    async fn run_cypher(&self, cypher: &str, params: Params) -> Result<(), AppError>;
}

/// A graph database client with an explicit connection lifecycle.
#[async_trait]
pub trait GraphClient: CypherExecutor {
    /// Round-trips a trivial query to verify the connection is usable.
    async fn ping(&self) -> Result<(), AppError>;

    /// Releases the underlying driver.
    ///
    /// Closing twice is a no-op. Queries issued after closing fail with
    /// [`AppError::NotConnected`].
    async fn close(&self) -> Result<(), AppError>;
}
