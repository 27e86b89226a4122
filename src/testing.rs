//! In-process doubles for the model and graph seams, shared by unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value as JsonValue};

use crate::error::AppError;
use crate::graph::{CypherExecutor, GraphClient, Params, Row, RowStream};
use crate::llm::{ChatModel, Embedder};

pub fn row(pairs: &[(&str, JsonValue)]) -> Row {
    Row::new(
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect::<HashMap<_, _>>(),
    )
}

/// Graph double: answers schema procedures with the seeded Topic schema and
/// every other read with `rows`. Records each statement it sees.
#[derive(Default)]
pub struct StubGraph {
    pub rows: Vec<Row>,
    pub unreachable: bool,
    pub statements: Mutex<Vec<(String, Params)>>,
    pub closes: AtomicUsize,
}

impl StubGraph {
    pub fn with_rows(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    pub fn statements(&self) -> Vec<String> {
        self.statements
            .lock()
            .unwrap()
            .iter()
            .map(|(s, _)| s.clone())
            .collect()
    }

    fn record(&self, cypher: &str, params: Params) -> Result<(), AppError> {
        if self.unreachable || self.closes.load(Ordering::SeqCst) > 0 {
            return Err(AppError::NotConnected("Neo4j"));
        }
        self.statements
            .lock()
            .unwrap()
            .push((cypher.to_string(), params));
        Ok(())
    }

    fn rows_for(&self, cypher: &str) -> Vec<Row> {
        if cypher.contains("db.schema.nodeTypeProperties") {
            vec![row(&[
                ("nodeLabels", json!(["Topic"])),
                ("propertyName", json!("name")),
                ("propertyTypes", json!(["String"])),
            ])]
        } else if cypher.contains("db.schema.relTypeProperties") {
            vec![
                row(&[("relType", json!(":`USES`")), ("propertyName", JsonValue::Null)]),
                row(&[("relType", json!(":`IS_A`")), ("propertyName", JsonValue::Null)]),
            ]
        } else if cypher.contains("from_labels") {
            vec![row(&[
                ("from_labels", json!(["Topic"])),
                ("rel_type", json!("USES")),
                ("to_labels", json!(["Topic"])),
            ])]
        } else {
            self.rows.clone()
        }
    }
}

#[async_trait]
impl CypherExecutor for StubGraph {
    async fn execute_cypher(&self, cypher: &str, params: Params) -> Result<RowStream<'_>, AppError> {
        self.record(cypher, params)?;
        let rows = self.rows_for(cypher);
        Ok(Box::pin(futures::stream::iter(rows.into_iter().map(Ok))))
    }

    async fn run_cypher(&self, cypher: &str, params: Params) -> Result<(), AppError> {
        self.record(cypher, params)
    }
}

#[async_trait]
impl GraphClient for StubGraph {
    async fn ping(&self) -> Result<(), AppError> {
        self.record("RETURN 1", Params::new())
    }

    async fn close(&self) -> Result<(), AppError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

type Responder = dyn Fn(&str) -> Result<String, AppError> + Send + Sync;

/// Chat double answering through a closure and recording every prompt.
pub struct ScriptedChat {
    responder: Box<Responder>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedChat {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&str) -> Result<String, AppError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Answers Cypher-generation prompts with `cypher`, row-phrasing prompts
    /// with `graph_answer` and anything else with `final_answer`.
    pub fn graph_rag(cypher: &str, graph_answer: &str, final_answer: &str) -> Self {
        let (cypher, graph_answer, final_answer) = (
            cypher.to_string(),
            graph_answer.to_string(),
            final_answer.to_string(),
        );
        Self::new(move |prompt| {
            Ok(if prompt.starts_with("Task: Generate a Cypher statement") {
                format!("```cypher\n{}\n```", cypher)
            } else if prompt.starts_with("You are an assistant") {
                graph_answer.clone()
            } else {
                final_answer.clone()
            })
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedChat {
    async fn complete(&self, prompt: &str) -> Result<String, AppError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        (self.responder)(prompt)
    }
}

/// Three-dimensional keyword embedder: one axis each for GraphRAG, Neo4j and Milvus.
#[derive(Default)]
pub struct KeywordEmbedder {
    pub failing: bool,
}

impl KeywordEmbedder {
    fn vector(text: &str) -> Vec<f32> {
        ["GraphRAG", "Neo4j", "Milvus"]
            .iter()
            .map(|kw| if text.contains(kw) { 1.0 } else { 0.0 })
            .collect()
    }
}

#[async_trait]
impl Embedder for KeywordEmbedder {
    fn dimension(&self) -> usize {
        3
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, AppError> {
        if self.failing {
            return Err(AppError::Embedding("embedding service unavailable".to_string()));
        }
        Ok(Self::vector(text))
    }

    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, AppError> {
        if self.failing {
            return Err(AppError::Embedding("embedding service unavailable".to_string()));
        }
        Ok(texts.iter().map(|t| Self::vector(t)).collect())
    }
}
