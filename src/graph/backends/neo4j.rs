//! Neo4j backend implementation over the Bolt protocol.
//!
//! # Example
//!
//! ```ignore
//! use graphrag::graph::backends::neo4j::Neo4jClient;
//! use graphrag::graph::QueryExt;
//!
//! let client = Neo4jClient::connect("bolt://localhost:7687", "neo4j", "password123").await?;
//! let rows = client.query("MATCH (t:Topic) RETURN t.name AS name").fetch_all().await?;
//! ```

use std::collections::HashMap;

use async_stream::try_stream;
use async_trait::async_trait;
use neo4rs::{query, BoltList, BoltMap, BoltNull, BoltType, Graph};
use serde_json::Value as JsonValue;
use tokio::sync::RwLock;

use crate::error::AppError;
use crate::graph::row::{Params, Row, RowStream};
use crate::graph::traits::{CypherExecutor, GraphClient};

const STORE: &str = "Neo4j";

/// Neo4j graph client.
///
/// Wraps the neo4rs connection pool. The pool is dropped on [`close`],
/// after which every query fails with [`AppError::NotConnected`].
///
/// [`close`]: GraphClient::close
pub struct Neo4jClient {
    graph: RwLock<Option<Graph>>,
    uri: String,
}

impl Neo4jClient {
    /// Opens a driver and verifies it with a `RETURN 1` round trip.
    pub async fn connect(uri: &str, user: &str, password: &str) -> Result<Self, AppError> {
        let graph = Graph::new(uri, user, password)
            .await
            .map_err(|e| AppError::connection(STORE, e))?;

        let client = Self {
            graph: RwLock::new(Some(graph)),
            uri: uri.to_string(),
        };
        client
            .ping()
            .await
            .map_err(|e| AppError::connection(STORE, e))?;

        Ok(client)
    }

    /// Clones the pool handle out of the lock so no guard is held across awaits.
    async fn graph(&self) -> Result<Graph, AppError> {
        self.graph
            .read()
            .await
            .clone()
            .ok_or(AppError::NotConnected(STORE))
    }

    fn build_query(cypher: &str, params: Params) -> neo4rs::Query {
        params
            .into_iter()
            .fold(query(cypher), |q, (name, value)| {
                q.param(&name, json_to_bolt(value))
            })
    }
}

#[async_trait]
impl CypherExecutor for Neo4jClient {
    async fn execute_cypher(
        &self,
        cypher: &str,
        params: Params,
    ) -> Result<RowStream<'_>, AppError> {
        let graph = self.graph().await?;
        let statement = cypher.to_string();
        let mut rows = graph
            .execute(Self::build_query(cypher, params))
            .await
            .map_err(|e| AppError::Query {
                message: e.to_string(),
                query: statement.clone(),
            })?;

        Ok(Box::pin(try_stream! {
            while let Some(row) = rows.next().await? {
                yield convert_row(&row, &statement)?;
            }
        }))
    }

    async fn run_cypher(&self, cypher: &str, params: Params) -> Result<(), AppError> {
        let graph = self.graph().await?;
        graph
            .run(Self::build_query(cypher, params))
            .await
            .map_err(|e| AppError::Query {
                message: e.to_string(),
                query: cypher.to_string(),
            })
    }
}

#[async_trait]
impl GraphClient for Neo4jClient {
    async fn ping(&self) -> Result<(), AppError> {
        self.run_cypher("RETURN 1", Params::new()).await
    }

    async fn close(&self) -> Result<(), AppError> {
        if self.graph.write().await.take().is_some() {
            tracing::debug!("Closed Neo4j driver for {}", self.uri);
        }
        Ok(())
    }
}

/// Converts a Bolt row into a JSON row.
fn convert_row(row: &neo4rs::Row, query: &str) -> Result<Row, AppError> {
    row.to::<HashMap<String, JsonValue>>()
        .map(Row::new)
        .map_err(|e| AppError::Query {
            message: format!("failed to decode row: {}", e),
            query: query.to_string(),
        })
}

/// Converts a JSON parameter into a Bolt value.
///
/// Integers that fit in `i64` stay integers; every other number is sent as a float.
fn json_to_bolt(value: JsonValue) -> BoltType {
    match value {
        JsonValue::Null => BoltType::Null(BoltNull),
        JsonValue::Bool(b) => b.into(),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => i.into(),
            None => n.as_f64().unwrap_or_default().into(),
        },
        JsonValue::String(s) => s.into(),
        JsonValue::Array(items) => {
            let mut list = BoltList::with_capacity(items.len());
            for item in items {
                list.push(json_to_bolt(item));
            }
            BoltType::List(list)
        }
        JsonValue::Object(map) => {
            let mut bolt = BoltMap::with_capacity(map.len());
            for (key, item) in map {
                bolt.put(key.into(), json_to_bolt(item));
            }
            BoltType::Map(bolt)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_to_bolt_scalars() {
        assert!(matches!(json_to_bolt(JsonValue::Null), BoltType::Null(_)));
        assert!(matches!(json_to_bolt(json!(true)), BoltType::Boolean(_)));
        assert!(matches!(json_to_bolt(json!(42)), BoltType::Integer(_)));
        assert!(matches!(json_to_bolt(json!(0.5)), BoltType::Float(_)));
        assert!(matches!(json_to_bolt(json!("GraphRAG")), BoltType::String(_)));
    }

    #[test]
    fn test_json_to_bolt_nested() {
        assert!(matches!(json_to_bolt(json!(["a", 1])), BoltType::List(_)));
        assert!(matches!(
            json_to_bolt(json!({"name": "Neo4j", "tags": ["graph"]})),
            BoltType::Map(_)
        ));
    }
}
