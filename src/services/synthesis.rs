//! Final answer synthesis over both retrieval legs.

use crate::chain::prompts::{self, render};
use crate::context::AppChatModel;
use crate::error::AppError;
use crate::models::{Document, GraphAnswer, LegOutcome, QueryResult};

const VECTOR_HEADER: &str = "[Vector search results]";
const GRAPH_HEADER: &str = "[Graph search results]";

/// Merges both legs into one context block, vector results first.
///
/// A failed leg keeps its header with an empty body.
pub fn build_context(
    vector: &LegOutcome<Vec<Document>>,
    graph: &LegOutcome<GraphAnswer>,
) -> String {
    let graph_header = format!("\n{}", GRAPH_HEADER);
    let mut parts: Vec<&str> = vec![VECTOR_HEADER];
    if let Some(docs) = vector.success() {
        parts.extend(docs.iter().map(|d| d.text.as_str()));
    }
    parts.push(&graph_header);
    parts.push(graph.success().map(|g| g.answer.as_str()).unwrap_or_default());
    parts.join("\n\n")
}

/// Asks the chat model for the final answer.
#[derive(Clone)]
pub struct SynthesisService {
    llm: AppChatModel,
}

impl SynthesisService {
    pub fn new(llm: AppChatModel) -> Self {
        Self { llm }
    }

    /// Generates an answer to `query` from `context`. Errors propagate.
    pub async fn synthesize(&self, query: &str, context: &str) -> Result<String, AppError> {
        let prompt = render(prompts::FINAL_ANSWER, &[("context", context), ("query", query)]);
        let answer = self.llm.complete(&prompt).await?;
        Ok(answer.trim().to_string())
    }

    /// Builds the context from both legs and answers `query`.
    pub async fn answer(
        &self,
        query: &str,
        vector: LegOutcome<Vec<Document>>,
        graph: LegOutcome<GraphAnswer>,
    ) -> Result<QueryResult, AppError> {
        let context = build_context(&vector, &graph);
        tracing::debug!("Synthesis context:\n{}", context);
        let answer = self.synthesize(query, &context).await?;

        Ok(QueryResult {
            query: query.to_string(),
            answer,
            vector,
            graph,
        })
    }
}
