//! Integration tests for the Milvus REST backend.
//!
//! These tests require a running Milvus standalone instance on
//! `localhost:19530`. No OpenAI key is needed: vectors are synthetic.
//! Run with: `cargo test --features integration --test milvus_integration`

#![cfg(feature = "integration")]

use graphrag::config::{CollectionConfig, MilvusConfig};
use graphrag::error::AppError;
use graphrag::schema::create_collection;
use graphrag::vector::milvus::MilvusClient;
use graphrag::vector::{CollectionSpec, IndexType, MetricType, Record, SearchRequest, VectorStore};
use serial_test::serial;

const DIM: usize = 8;

async fn create_client() -> MilvusClient {
    MilvusClient::connect(&MilvusConfig::default())
        .await
        .expect("Failed to connect to Milvus")
}

fn spec(name: &str) -> CollectionSpec {
    let config = CollectionConfig {
        dimension: DIM,
        index_type: IndexType::IvfFlat,
        metric: MetricType::L2,
        nlist: 16,
        ..CollectionConfig::default()
    };
    CollectionSpec::from_config(name, &config)
}

fn unit(axis: usize) -> Vec<f32> {
    (0..DIM).map(|i| if i == axis { 1.0 } else { 0.0 }).collect()
}

/// Drops test collections and releases the client.
async fn cleanup(client: &MilvusClient, collections: &[&str]) {
    for name in collections {
        let _ = client.drop_collection(name).await;
    }
    let _ = client.disconnect().await;
}

/// A unique collection name per test run.
fn collection_name(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}_{}", prefix, nanos)
}

#[serial]
mod vector_tests {
    use super::*;

    #[tokio::test]
    async fn test_duplicate_collection_fails() {
        let client = create_client().await;
        let spec = spec(&collection_name("it_dup"));

        create_collection(&client, &spec).await.expect("first create failed");
        let result = create_collection(&client, &spec).await;
        cleanup(&client, &[spec.name.as_str()]).await;

        assert!(matches!(result, Err(AppError::CollectionExists(_))));
    }

    #[tokio::test]
    async fn test_insert_and_search_closest_first() {
        let client = create_client().await;
        let name = collection_name("it_search");
        create_collection(&client, &spec(&name)).await.unwrap();

        let records: Vec<Record> = ["GraphRAG", "Neo4j", "Milvus"]
            .iter()
            .enumerate()
            .map(|(i, text)| Record {
                id: i as i64,
                text: text.to_string(),
                embedding: unit(i),
            })
            .collect();

        assert_eq!(client.insert(&name, &records).await.unwrap(), 3);
        client.flush(&name).await.unwrap();
        client.load_collection(&name).await.unwrap();

        let query = unit(2);
        let docs = client
            .search(&SearchRequest {
                collection: &name,
                vector: &query,
                top_k: 3,
                metric: MetricType::L2,
                nprobe: 10,
            })
            .await
            .unwrap();

        cleanup(&client, &[name.as_str()]).await;

        assert_eq!(docs.len(), 3);
        assert_eq!(docs[0].text, "Milvus");
        assert!(docs[0].score <= docs[1].score);
    }

    #[tokio::test]
    async fn test_drop_collection() {
        let client = create_client().await;
        let name = collection_name("it_drop");
        create_collection(&client, &spec(&name)).await.unwrap();

        client.drop_collection(&name).await.unwrap();
        let exists = client.has_collection(&name).await;
        cleanup(&client, &[]).await;

        assert!(!exists.unwrap());
    }

    #[tokio::test]
    async fn test_search_missing_collection_fails() {
        let client = create_client().await;
        let query = unit(0);
        let result = client
            .search(&SearchRequest {
                collection: "graphrag_missing_collection",
                vector: &query,
                top_k: 1,
                metric: MetricType::L2,
                nprobe: 10,
            })
            .await;
        assert!(matches!(result, Err(AppError::VectorStore { .. })));
    }
}
