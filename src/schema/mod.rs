//! Store initialization: graph constraints, vector collections and demo data.
//!
//! Graph statements are idempotent (`IF NOT EXISTS`, `MERGE`) and safe to
//! re-run. Collection creation is not: an existing collection is reported
//! as [`AppError::CollectionExists`] and left untouched.

mod seed;

pub use seed::{seed_graph, seed_vector_store, RELATIONSHIPS, SAMPLE_TEXTS, TOPICS};

use crate::error::AppError;
use crate::graph::{CypherExecutor, QueryExt};
use crate::vector::{CollectionSpec, VectorStore};

/// Uniqueness constraints on the demo graph.
pub const CONSTRAINTS: &[&str] = &[
    "CREATE CONSTRAINT paper_id IF NOT EXISTS FOR (p:Paper) REQUIRE p.id IS UNIQUE",
    "CREATE CONSTRAINT topic_name IF NOT EXISTS FOR (t:Topic) REQUIRE t.name IS UNIQUE",
];

/// Declares the graph constraints.
pub async fn init_graph_schema<E>(graph: &E) -> Result<(), AppError>
where
    E: CypherExecutor + ?Sized,
{
    for constraint in CONSTRAINTS {
        graph.query(constraint).run().await?;
    }
    tracing::info!("Initialized Neo4j schema");
    Ok(())
}

/// Creates a collection and builds its index on the embedding field.
pub async fn create_collection<S>(store: &S, spec: &CollectionSpec) -> Result<(), AppError>
where
    S: VectorStore + ?Sized,
{
    if spec.dimension == 0 {
        return Err(AppError::Validation("dimension must be positive".to_string()));
    }
    if store.has_collection(&spec.name).await? {
        return Err(AppError::CollectionExists(spec.name.clone()));
    }

    store.create_collection(spec).await?;
    store.create_index(&spec.name, &spec.index).await?;
    tracing::info!(
        "Created Milvus collection '{}' (dim {}, {} {})",
        spec.name,
        spec.dimension,
        spec.index.index_type,
        spec.index.metric
    );
    Ok(())
}
