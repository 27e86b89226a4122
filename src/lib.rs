//! graphrag - hybrid retrieval over a vector store and a graph store
//!
//! A question is answered from two sources at once: a top-k similarity
//! search over embedded passages in Milvus, and a natural-language-to-Cypher
//! chain over a Neo4j graph. Both outputs are merged into one context block
//! and handed to a chat model for the final answer.

pub mod agent;
pub mod chain;
pub mod cli;
pub mod config;
pub mod connections;
pub mod context;
pub mod error;
pub mod graph;
pub mod llm;
pub mod models;
pub mod schema;
pub mod services;
pub mod vector;

#[cfg(test)]
mod testing;
