//! Vector store abstraction.
//!
//! The orchestration only needs a narrow slice of a vector database: create
//! a collection with a fixed schema, build an ANN index over its embedding
//! field, insert records and run top-k searches. [`VectorStore`] captures
//! that slice; [`milvus::MilvusClient`] talks to a real Milvus server and
//! [`memory::MemoryVectorStore`] is an exact in-process implementation.
//!
//! Every collection has the same three fields:
//!
//! | Field | Type | Notes |
//! |-------|------|-------|
//! | `id` | Int64 | primary key, supplied by the caller |
//! | `text` | VarChar | at most [`MAX_TEXT_LENGTH`] characters |
//! | `embedding` | FloatVector | fixed dimension per collection |

pub mod memory;
pub mod milvus;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::CollectionConfig;
use crate::error::AppError;
use crate::models::Document;

/// Primary key field name.
pub const ID_FIELD: &str = "id";
/// Passage text field name.
pub const TEXT_FIELD: &str = "text";
/// Embedding field name.
pub const VECTOR_FIELD: &str = "embedding";
/// Maximum length of the `text` field.
pub const MAX_TEXT_LENGTH: usize = 65535;

/// Distance metric used by the index and by searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricType {
    /// Squared Euclidean distance; smaller is closer.
    #[serde(rename = "L2")]
    L2,
    /// Inner product; larger is closer.
    #[serde(rename = "IP")]
    Ip,
    /// Cosine similarity; larger is closer.
    #[serde(rename = "COSINE")]
    Cosine,
}

impl MetricType {
    /// Whether smaller scores rank first for this metric.
    pub fn ascending(&self) -> bool {
        matches!(self, MetricType::L2)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::L2 => "L2",
            MetricType::Ip => "IP",
            MetricType::Cosine => "COSINE",
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Approximate-nearest-neighbor index type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexType {
    /// Inverted file index with raw vectors in each cluster.
    #[serde(rename = "IVF_FLAT")]
    IvfFlat,
    /// Brute-force scan, no clustering.
    #[serde(rename = "FLAT")]
    Flat,
}

impl IndexType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexType::IvfFlat => "IVF_FLAT",
            IndexType::Flat => "FLAT",
        }
    }
}

impl fmt::Display for IndexType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Index definition over the embedding field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSpec {
    pub metric: MetricType,
    pub index_type: IndexType,
    /// Number of IVF clusters (ignored by `FLAT`).
    pub nlist: u32,
}

/// Collection definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSpec {
    pub name: String,
    pub dimension: usize,
    pub index: IndexSpec,
}

impl CollectionSpec {
    /// Builds a spec for `name` from the configured schema and index parameters.
    pub fn from_config(name: &str, config: &CollectionConfig) -> Self {
        Self {
            name: name.to_string(),
            dimension: config.dimension,
            index: IndexSpec {
                metric: config.metric,
                index_type: config.index_type,
                nlist: config.nlist,
            },
        }
    }
}

/// A row to insert.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub id: i64,
    pub text: String,
    pub embedding: Vec<f32>,
}

/// Top-k search parameters.
#[derive(Debug, Clone, Copy)]
pub struct SearchRequest<'a> {
    pub collection: &'a str,
    pub vector: &'a [f32],
    pub top_k: usize,
    pub metric: MetricType,
    /// Number of IVF clusters probed.
    pub nprobe: u32,
}

/// A vector database holding passage collections.
#[async_trait]
pub trait VectorStore: Send + Sync {
    async fn has_collection(&self, name: &str) -> Result<bool, AppError>;

    /// Creates a collection with the fixed `id`/`text`/`embedding` schema.
    ///
    /// Does not build an index; see [`create_index`](VectorStore::create_index).
    async fn create_collection(&self, spec: &CollectionSpec) -> Result<(), AppError>;

    /// Builds the ANN index over the embedding field.
    async fn create_index(&self, collection: &str, index: &IndexSpec) -> Result<(), AppError>;

    /// Drops the collection and its data. Dropping a missing collection is not an error.
    async fn drop_collection(&self, name: &str) -> Result<(), AppError>;

    /// Loads the collection into memory so it can be searched.
    async fn load_collection(&self, name: &str) -> Result<(), AppError>;

    /// Inserts records and returns how many were written.
    async fn insert(&self, collection: &str, records: &[Record]) -> Result<usize, AppError>;

    /// Seals pending inserts so they are visible to searches.
    async fn flush(&self, collection: &str) -> Result<(), AppError>;

    /// Returns the `top_k` closest passages in the store's native order.
    async fn search(&self, request: &SearchRequest<'_>) -> Result<Vec<Document>, AppError>;

    /// Releases server-side resources held for this client.
    async fn disconnect(&self) -> Result<(), AppError>;
}
