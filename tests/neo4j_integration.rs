//! Integration tests for the Neo4j backend and graph seeding.
//!
//! These tests require a running Neo4j instance (defaults match
//! `docker run -e NEO4J_AUTH=neo4j/password123 -p 7687:7687 neo4j:5`).
//! Run with: `cargo test --features integration --test neo4j_integration`

#![cfg(feature = "integration")]

use graphrag::config::Neo4jConfig;
use graphrag::graph::backends::neo4j::Neo4jClient;
use graphrag::graph::{CypherExecutor, GraphClient, GraphSchema, Params, QueryExt};
use graphrag::schema::{init_graph_schema, seed_graph, RELATIONSHIPS, TOPICS};
use serial_test::serial;

async fn create_client() -> Neo4jClient {
    let config = Neo4jConfig::default();
    Neo4jClient::connect(&config.uri, &config.user, &config.password)
        .await
        .expect("Failed to connect to test database")
}

async fn cleanup(client: &Neo4jClient) {
    let _ = client
        .run_cypher("MATCH (n:IntegrationTest) DETACH DELETE n", Params::new())
        .await;
}

#[serial]
mod graph_tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_and_ping() {
        let client = create_client().await;
        client.ping().await.expect("ping failed");
        client.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let client = create_client().await;
        client.close().await.unwrap();
        client.close().await.unwrap();

        let err = client.ping().await.unwrap_err();
        assert!(err.to_string().contains("Not connected"));
    }

    #[tokio::test]
    async fn test_params_round_trip() {
        let client = create_client().await;
        cleanup(&client).await;

        client
            .query("CREATE (n:IntegrationTest {name: $name, tags: $tags, weight: $weight})")
            .param("name", "node-1")
            .param("tags", vec!["a", "b"])
            .param("weight", 0.5)
            .run()
            .await
            .expect("create failed");

        let row = client
            .query("MATCH (n:IntegrationTest {name: $name}) RETURN n.tags AS tags, n.weight AS weight")
            .param("name", "node-1")
            .fetch_one()
            .await
            .unwrap()
            .expect("node not found");

        assert_eq!(row.get::<Vec<String>>("tags").unwrap(), vec!["a", "b"]);
        assert_eq!(row.get::<f64>("weight").unwrap(), 0.5);

        cleanup(&client).await;
    }

    #[tokio::test]
    async fn test_schema_init_is_idempotent() {
        let client = create_client().await;
        init_graph_schema(&client).await.expect("first init failed");
        init_graph_schema(&client).await.expect("second init failed");

        let rows = client
            .query("SHOW CONSTRAINTS YIELD name WHERE name IN ['paper_id', 'topic_name'] RETURN name")
            .fetch_all()
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn test_seed_graph_is_rerunnable() {
        let client = create_client().await;
        init_graph_schema(&client).await.unwrap();
        seed_graph(&client).await.expect("first seed failed");
        seed_graph(&client).await.expect("second seed failed");

        let row = client
            .query("MATCH (t:Topic) WHERE t.name IN $names RETURN count(t) AS topics")
            .param("names", TOPICS)
            .fetch_one()
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.get::<i64>("topics").unwrap(), TOPICS.len() as i64);

        let rows = client
            .query(
                "MATCH (:Topic {name: 'GraphRAG'})-[:USES]->(t:Topic) RETURN t.name AS name ORDER BY name",
            )
            .fetch_all()
            .await
            .unwrap();
        let names: Vec<String> = rows.iter().map(|r| r.get("name").unwrap()).collect();
        assert_eq!(names, vec!["Milvus", "Neo4j"]);
        assert_eq!(
            RELATIONSHIPS.iter().filter(|(from, _, _)| *from == "GraphRAG").count(),
            2
        );
    }

    #[tokio::test]
    async fn test_schema_introspection_after_seed() {
        let client = create_client().await;
        seed_graph(&client).await.unwrap();

        let schema = GraphSchema::introspect(&client).await.unwrap();
        assert!(schema.node_properties.contains_key("Topic"));
        assert!(schema.to_string().contains("(:Topic)-[:USES]->(:Topic)"));
    }
}
