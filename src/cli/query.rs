//! Query command handler.

use clap::Args;
use color_eyre::Result;

use crate::agent::GraphRagAgent;
use crate::config::Config;
use crate::models::QueryResult;

use super::collection_name;

/// Arguments for `graphrag query`.
#[derive(Args, Debug)]
pub struct QueryCommand {
    /// Collection name (defaults to `collection.name` from config)
    #[arg(long)]
    pub collection: Option<String>,

    /// Number of passages retrieved from the vector store
    #[arg(long)]
    pub top_k: Option<usize>,

    /// Print the full result as JSON
    #[arg(long)]
    pub json: bool,

    /// The question
    #[arg(required = true)]
    pub text: Vec<String>,
}

impl QueryCommand {
    pub async fn run(self, config: Config) -> Result<()> {
        let collection = collection_name(&config, self.collection);
        let top_k = self.top_k.unwrap_or(config.collection.top_k);
        let question = self.text.join(" ");

        let mut agent = GraphRagAgent::connect(config).await?;
        let result = agent.query_top_k(&question, &collection, top_k).await;
        agent.close().await;
        let result = result?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            print!("{}", render(&result));
        }
        Ok(())
    }
}

/// Plain-text rendering of a result.
fn render(result: &QueryResult) -> String {
    let mut out = format!("Question: {}\nAnswer: {}\n", result.query, result.answer);

    out.push_str("\nVector search results:\n");
    match result.vector.reason() {
        Some(reason) => out.push_str(&format!("  (failed: {})\n", reason)),
        None => {
            for (i, text) in result.vector_results().iter().enumerate() {
                out.push_str(&format!("  {}. {}\n", i + 1, text));
            }
        }
    }

    out.push_str("\nGraph search result:\n");
    match result.graph.reason() {
        Some(reason) => out.push_str(&format!("  (failed: {})\n", reason)),
        None => {
            if let Some(cypher) = result.cypher() {
                out.push_str(&format!("  Cypher: {}\n", cypher.replace('\n', " ")));
            }
            out.push_str(&format!("  {}\n", result.graph_result()));
        }
    }
    out
}
