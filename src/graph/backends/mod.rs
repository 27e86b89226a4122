//! Backend implementations for graph databases.
//!
//! Each backend implements the core traits from [`crate::graph`]:
//!
//! - [`CypherExecutor`](crate::graph::CypherExecutor) - query execution
//! - [`GraphClient`](crate::graph::GraphClient) - health check and close
//!
//! | Backend | Module | Protocol |
//! |---------|--------|----------|
//! | Neo4j | [`neo4j`] | Bolt (neo4rs) |

pub mod neo4j;
