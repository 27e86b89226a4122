//! Graph abstraction layer for the graph store.
//!
//! # Architecture
//!
//! - [`CypherExecutor`] - Execute Cypher queries (implemented by every backend)
//! - [`GraphClient`] - Connection lifecycle (ping, close)
//! - [`Query`] / [`QueryExt`] - Fluent query builder over any executor
//! - [`GraphSchema`] - Schema introspection for prompt construction
//! - [`write_clauses`] - Tokenizer-based detection of mutating statements
//!
//! # Usage
//!
//! ```ignore
//! use graphrag::graph::{backends::neo4j::Neo4jClient, QueryExt};
//!
//! let client = Neo4jClient::connect(uri, user, password).await?;
//!
//! let rows = client
//!     .query("MATCH (t:Topic {name: $name})-[:USES]->(u:Topic) RETURN u.name AS name")
//!     .param("name", "GraphRAG")
//!     .fetch_all()
//!     .await?;
//!
//! client
//!     .query("MERGE (t:Topic {name: $name})")
//!     .param("name", "Vector DB")
//!     .run()
//!     .await?;
//! ```

mod cypher;
mod macros;
mod query;
mod row;
mod schema;
mod traits;

pub mod backends;

pub use cypher::{extract_statement, is_read_only, write_clauses, ParseError};
pub use query::{Query, QueryExt};
pub use row::{Params, Row, RowStream};
pub use schema::{GraphSchema, RelationshipPattern};
pub use traits::{CypherExecutor, GraphClient};

#[doc(inline)]
pub use crate::cypher;
