//! CLI module for graphrag.
//!
//! Subcommands:
//! - `init`: Create the graph constraints and vector collection, then seed demo data
//! - `query`: Answer a question from both stores
//! - `demo`: Initialize, seed and run the demo questions

mod demo;
mod init;
mod query;

use clap::{Parser, Subcommand};

use crate::config::Config;

use demo::run_demo;
use init::run_init;

pub use query::QueryCommand;

/// graphrag - hybrid vector and graph retrieval
#[derive(Parser)]
#[command(name = "graphrag")]
#[command(about = "Answer questions from a Milvus vector store and a Neo4j graph together")]
#[command(version)]
pub struct App {
    /// Run in verbose mode
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the schema and collection, then seed the demo data
    Init {
        /// Collection name (defaults to `collection.name` from config)
        #[arg(long)]
        collection: Option<String>,

        /// Reuse the collection if it already exists instead of failing
        #[arg(long)]
        keep_existing: bool,
    },

    /// Answer a question
    Query(QueryCommand),

    /// Initialize, seed and run the demo questions
    Demo {
        /// Collection name (defaults to `collection.name` from config)
        #[arg(long)]
        collection: Option<String>,

        /// Reuse the collection if it already exists instead of failing
        #[arg(long)]
        keep_existing: bool,
    },
}

impl App {
    /// Run the CLI application.
    pub async fn run(self) -> color_eyre::Result<()> {
        let config = Config::load()?;
        tracing::debug!("Loaded configuration: {:?}", config.collection);

        match self.command {
            Command::Init {
                collection,
                keep_existing,
            } => run_init(config, collection, keep_existing).await,
            Command::Query(cmd) => cmd.run(config).await,
            Command::Demo {
                collection,
                keep_existing,
            } => run_demo(config, collection, keep_existing).await,
        }
    }
}

/// Resolves `--collection` against the configured default.
fn collection_name(config: &Config, collection: Option<String>) -> String {
    collection.unwrap_or_else(|| config.collection.name.clone())
}
