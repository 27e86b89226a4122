//! Macro for convenient Cypher query construction.

/// Shorthand for `executor.query(...)` with named parameters.
///
/// ```ignore
/// use graphrag::cypher;
///
/// cypher!(graph, "MERGE (t:Topic {name: $name})", name = "GraphRAG")
///     .run()
///     .await?;
/// ```
#[macro_export]
macro_rules! cypher {
    ($graph:expr, $query:expr) => {
        $graph.query($query)
    };
    ($graph:expr, $query:expr, $($name:ident = $value:expr),+ $(,)?) => {
        $graph.query($query)$(.param(stringify!($name), $value))+
    };
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use crate::error::AppError;
    use crate::graph::query::QueryExt;
    use crate::graph::row::{Params, RowStream};
    use crate::graph::traits::CypherExecutor;

    #[derive(Default)]
    struct RecordingExecutor {
        calls: Mutex<Vec<(String, Params)>>,
    }

    #[async_trait::async_trait]
    impl CypherExecutor for RecordingExecutor {
        async fn execute_cypher(
            &self,
            _cypher: &str,
            _params: Params,
        ) -> Result<RowStream<'_>, AppError> {
            Ok(Box::pin(futures::stream::empty()))
        }

        async fn run_cypher(&self, cypher: &str, params: Params) -> Result<(), AppError> {
            self.calls.lock().unwrap().push((cypher.to_string(), params));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_cypher_macro_binds_named_params() {
        let executor = RecordingExecutor::default();
        cypher!(
            executor,
            "MATCH (a:Topic {name: $from}), (b:Topic {name: $to}) MERGE (a)-[:USES]->(b)",
            from = "GraphRAG",
            to = "Milvus",
        )
        .run()
        .await
        .unwrap();

        let calls = executor.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1["from"], serde_json::json!("GraphRAG"));
        assert_eq!(calls[0].1["to"], serde_json::json!("Milvus"));
    }

    #[tokio::test]
    async fn test_cypher_macro_no_params() {
        let executor = RecordingExecutor::default();
        cypher!(executor, "RETURN 1").run().await.unwrap();

        let calls = executor.calls.lock().unwrap();
        assert!(calls[0].1.is_empty());
    }
}
