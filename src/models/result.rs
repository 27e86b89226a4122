//! Query results.

use serde::{Serialize, Serializer};

use crate::graph::Row;
use crate::models::{Document, LegOutcome};

/// Intermediate steps and answer of the natural-language-to-Cypher chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphAnswer {
    /// Statement generated by the model and executed against the graph.
    pub cypher: String,
    /// Rows handed to the answer prompt (already truncated).
    pub context: Vec<Row>,
    /// Natural-language phrasing of the rows.
    pub answer: String,
}

/// Final answer plus both raw retrieval outputs, for traceability.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub query: String,
    pub answer: String,
    pub vector: LegOutcome<Vec<Document>>,
    pub graph: LegOutcome<GraphAnswer>,
}

impl QueryResult {
    /// Passage texts from the vector leg, best first; empty if the leg failed.
    pub fn vector_results(&self) -> Vec<&str> {
        self.vector
            .success()
            .map(|docs| docs.iter().map(|d| d.text.as_str()).collect())
            .unwrap_or_default()
    }

    /// Graph leg answer; empty if the leg failed.
    pub fn graph_result(&self) -> &str {
        self.graph
            .success()
            .map(|g| g.answer.as_str())
            .unwrap_or_default()
    }

    /// Cypher executed by the graph leg, if it got that far.
    pub fn cypher(&self) -> Option<&str> {
        self.graph.success().map(|g| g.cypher.as_str())
    }
}

/// Flattened view used for JSON output.
#[derive(Serialize)]
struct QueryResultView<'a> {
    query: &'a str,
    answer: &'a str,
    vector_results: Vec<&'a str>,
    graph_result: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    cypher: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    vector_error: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    graph_error: Option<&'a str>,
}

impl Serialize for QueryResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        QueryResultView {
            query: &self.query,
            answer: &self.answer,
            vector_results: self.vector_results(),
            graph_result: self.graph_result(),
            cypher: self.cypher(),
            vector_error: self.vector.reason(),
            graph_error: self.graph.reason(),
        }
        .serialize(serializer)
    }
}
