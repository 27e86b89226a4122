//! Demo corpus for both stores.

use crate::cypher;
use crate::error::AppError;
use crate::graph::{CypherExecutor, QueryExt};
use crate::llm::Embedder;
use crate::vector::{Record, VectorStore};

/// Passages inserted into the vector store, with ids `0..`.
pub const SAMPLE_TEXTS: &[&str] = &[
    "GraphRAG is a new RAG approach that combines a graph database with a vector database.",
    "Neo4j is a graph database that can efficiently represent relationships between entities.",
    "Milvus is a vector database specialized in similarity search over large-scale vector data.",
];

/// `Topic` nodes in the demo graph.
pub const TOPICS: &[&str] = &["GraphRAG", "Neo4j", "Milvus", "Vector DB", "Graph DB"];

/// `(from, type, to)` relationships between topics.
pub const RELATIONSHIPS: &[(&str, &str, &str)] = &[
    ("GraphRAG", "USES", "Neo4j"),
    ("GraphRAG", "USES", "Milvus"),
    ("Neo4j", "IS_A", "Graph DB"),
    ("Milvus", "IS_A", "Vector DB"),
];

/// Embeds [`SAMPLE_TEXTS`], inserts them into `collection` and flushes.
///
/// Returns the number of inserted records.
pub async fn seed_vector_store<S, M>(
    store: &S,
    embedder: &M,
    collection: &str,
) -> Result<usize, AppError>
where
    S: VectorStore + ?Sized,
    M: Embedder + ?Sized,
{
    let texts: Vec<String> = SAMPLE_TEXTS.iter().map(|t| t.to_string()).collect();
    let vectors = embedder.embed_documents(&texts).await?;

    let records: Vec<Record> = texts
        .into_iter()
        .zip(vectors)
        .enumerate()
        .map(|(i, (text, embedding))| Record {
            id: i as i64,
            text,
            embedding,
        })
        .collect();

    let inserted = store.insert(collection, &records).await?;
    store.flush(collection).await?;
    tracing::info!("Inserted {} sample passages into '{}'", inserted, collection);

    Ok(inserted)
}

/// Merges the demo topics and their relationships.
pub async fn seed_graph<E>(graph: &E) -> Result<(), AppError>
where
    E: CypherExecutor + ?Sized,
{
    for name in TOPICS {
        cypher!(graph, "MERGE (t:Topic {name: $name})", name = *name)
            .run()
            .await?;
    }

    // Relationship types cannot be parameterized
    for (from, rel_type, to) in RELATIONSHIPS {
        let statement = format!(
            "MATCH (a:Topic {{name: $from}}), (b:Topic {{name: $to}}) MERGE (a)-[:{}]->(b)",
            rel_type
        );
        cypher!(graph, &statement, from = *from, to = *to)
            .run()
            .await?;
    }

    tracing::info!(
        "Seeded {} topics and {} relationships into Neo4j",
        TOPICS.len(),
        RELATIONSHIPS.len()
    );
    Ok(())
}
