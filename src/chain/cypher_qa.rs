//! Natural-language question answering over the graph store.
//!
//! One run makes two model calls around a single graph read:
//!
//! 1. render the graph schema and ask the model for a Cypher statement
//! 2. execute it, keeping at most `top_k` rows
//! 3. ask the model to phrase those rows as an answer
//!
//! Generated statements are checked for write clauses before they run
//! unless `allow_writes` is set.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::chain::prompts::{self, render};
use crate::config::GraphQaConfig;
use crate::error::AppError;
use crate::graph::{extract_statement, write_clauses, GraphClient, GraphSchema, QueryExt, Row};
use crate::llm::ChatModel;
use crate::models::GraphAnswer;

/// Question-to-Cypher-to-answer chain.
pub struct CypherQaChain {
    graph: Arc<dyn GraphClient>,
    llm: Arc<dyn ChatModel>,
    settings: GraphQaConfig,
    schema: RwLock<Option<String>>,
}

impl CypherQaChain {
    pub fn new(graph: Arc<dyn GraphClient>, llm: Arc<dyn ChatModel>, settings: GraphQaConfig) -> Self {
        Self {
            graph,
            llm,
            settings,
            schema: RwLock::new(None),
        }
    }

    /// Re-reads the graph schema; call after the graph has been reseeded.
    pub async fn refresh_schema(&self) -> Result<String, AppError> {
        let rendered = GraphSchema::introspect(self.graph.as_ref()).await?.to_string();
        *self.schema.write().await = Some(rendered.clone());
        Ok(rendered)
    }

    /// Rendered schema, introspected on first use.
    pub async fn schema(&self) -> Result<String, AppError> {
        if let Some(schema) = self.schema.read().await.as_ref() {
            return Ok(schema.clone());
        }
        self.refresh_schema().await
    }

    /// Asks the model for a Cypher statement answering `question`.
    pub async fn generate_cypher(&self, question: &str) -> Result<String, AppError> {
        let schema = self.schema().await?;
        let prompt = render(
            prompts::CYPHER_GENERATION,
            &[("schema", schema.trim_end()), ("question", question)],
        );

        let cypher = extract_statement(&self.llm.complete(&prompt).await?);
        if cypher.is_empty() {
            return Err(AppError::Llm("model returned an empty Cypher statement".to_string()));
        }
        Ok(cypher)
    }

    /// Rejects statements with write clauses unless writes are allowed.
    fn check_read_only(&self, cypher: &str) -> Result<(), AppError> {
        if self.settings.allow_writes {
            return Ok(());
        }
        let clauses = write_clauses(cypher)?;
        if clauses.is_empty() {
            Ok(())
        } else {
            Err(AppError::UnsafeCypher {
                clauses: clauses.join(", "),
                query: cypher.to_string(),
            })
        }
    }

    /// Answers `question` from the graph.
    pub async fn run(&self, question: &str) -> Result<GraphAnswer, AppError> {
        let cypher = self.generate_cypher(question).await?;
        tracing::info!("Generated Cypher: {}", cypher);

        self.check_read_only(&cypher)?;

        let context = self.graph.query(&cypher).fetch_many(self.settings.top_k).await?;
        tracing::debug!("Graph query returned {} rows", context.len());

        let answer = self.phrase(question, &context).await?;

        Ok(GraphAnswer {
            cypher,
            context,
            answer,
        })
    }

    async fn phrase(&self, question: &str, rows: &[Row]) -> Result<String, AppError> {
        let context = serde_json::to_string(rows)
            .map_err(|e| AppError::Internal(format!("failed to render graph rows: {}", e)))?;
        let prompt = render(prompts::CYPHER_QA, &[("context", &context), ("question", question)]);
        Ok(self.llm.complete(&prompt).await?.trim().to_string())
    }
}
