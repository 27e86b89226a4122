//! Demo command handler.

use color_eyre::Result;

use crate::agent::GraphRagAgent;
use crate::config::Config;
use crate::error::AppError;

use super::collection_name;
use super::init::prepare;

/// Questions asked by `graphrag demo`.
pub const DEMO_QUERIES: &[&str] = &[
    "What is GraphRAG?",
    "What is the difference between Neo4j and Milvus?",
    "Which databases does GraphRAG use?",
];

async fn ask_all(
    agent: &GraphRagAgent,
    collection: &str,
    keep_existing: bool,
) -> Result<(), AppError> {
    prepare(agent, collection, keep_existing).await?;

    println!("\n=== Running demo queries ===");
    for query in DEMO_QUERIES {
        println!("\nQuestion: {}", query);
        let result = agent.query(query, collection).await?;
        println!("Answer: {}", result.answer);
        println!("{}", "-".repeat(50));
    }
    Ok(())
}

/// Run the demo command.
pub(super) async fn run_demo(
    config: Config,
    collection: Option<String>,
    keep_existing: bool,
) -> Result<()> {
    let collection = collection_name(&config, collection);

    let mut agent = GraphRagAgent::connect(config).await?;
    let result = ask_all(&agent, &collection, keep_existing).await;
    agent.close().await;

    Ok(result?)
}
