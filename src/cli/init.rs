//! Init command handler.

use color_eyre::Result;

use crate::agent::GraphRagAgent;
use crate::config::Config;
use crate::error::AppError;

use super::collection_name;

/// Creates the schema and collection, then seeds both stores.
///
/// An existing collection fails the run with [`AppError::CollectionExists`].
/// With `keep_existing` it is used as is instead: its vectors are not
/// re-seeded, while the graph seed (MERGE-based) still runs.
pub(super) async fn prepare(
    agent: &GraphRagAgent,
    collection: &str,
    keep_existing: bool,
) -> Result<(), AppError> {
    match agent.initialize(collection).await {
        Ok(()) => {
            agent.seed_vectors(collection).await?;
        }
        Err(AppError::CollectionExists(name)) if keep_existing => {
            tracing::warn!(
                "Collection '{}' already exists; skipping sample passages",
                name
            );
        }
        Err(e) => return Err(e),
    }
    agent.seed_graph().await
}

/// Run the init command.
pub(super) async fn run_init(
    config: Config,
    collection: Option<String>,
    keep_existing: bool,
) -> Result<()> {
    let collection = collection_name(&config, collection);

    let mut agent = GraphRagAgent::connect(config).await?;
    let result = prepare(&agent, &collection, keep_existing).await;
    agent.close().await;
    result?;

    println!("Initialized collection '{}' and seeded the demo graph", collection);
    Ok(())
}
