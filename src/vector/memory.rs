//! Exact in-process vector store.
//!
//! Mirrors the observable behavior of the Milvus backend (collections must
//! be created before use, searches require a loaded collection, scores use
//! the same metric conventions) without approximate indexing. Used for
//! offline runs and tests.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::AppError;
use crate::models::Document;
use crate::vector::{
    CollectionSpec, IndexSpec, MetricType, Record, SearchRequest, VectorStore, MAX_TEXT_LENGTH,
};

#[derive(Debug)]
struct Collection {
    dimension: usize,
    index: Option<IndexSpec>,
    loaded: bool,
    records: Vec<Record>,
}

/// In-memory [`VectorStore`] with brute-force search.
#[derive(Debug, Default)]
pub struct MemoryVectorStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records stored in a collection.
    pub async fn count(&self, name: &str) -> Result<usize, AppError> {
        let collections = self.collections.read().await;
        let collection = collections
            .get(name)
            .ok_or_else(|| AppError::CollectionNotFound(name.to_string()))?;
        Ok(collection.records.len())
    }

    /// Index built on a collection, if any.
    pub async fn index(&self, name: &str) -> Option<IndexSpec> {
        self.collections.read().await.get(name).and_then(|c| c.index)
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn has_collection(&self, name: &str) -> Result<bool, AppError> {
        Ok(self.collections.read().await.contains_key(name))
    }

    async fn create_collection(&self, spec: &CollectionSpec) -> Result<(), AppError> {
        if spec.dimension == 0 {
            return Err(AppError::Validation("dimension must be positive".to_string()));
        }
        let mut collections = self.collections.write().await;
        if collections.contains_key(&spec.name) {
            return Err(AppError::CollectionExists(spec.name.clone()));
        }
        collections.insert(
            spec.name.clone(),
            Collection {
                dimension: spec.dimension,
                index: None,
                loaded: false,
                records: Vec::new(),
            },
        );
        Ok(())
    }

    async fn drop_collection(&self, name: &str) -> Result<(), AppError> {
        self.collections.write().await.remove(name);
        Ok(())
    }

    async fn create_index(&self, collection: &str, index: &IndexSpec) -> Result<(), AppError> {
        let mut collections = self.collections.write().await;
        let entry = collections
            .get_mut(collection)
            .ok_or_else(|| AppError::CollectionNotFound(collection.to_string()))?;
        entry.index = Some(*index);
        Ok(())
    }

    async fn load_collection(&self, name: &str) -> Result<(), AppError> {
        let mut collections = self.collections.write().await;
        let entry = collections
            .get_mut(name)
            .ok_or_else(|| AppError::CollectionNotFound(name.to_string()))?;
        if entry.index.is_none() {
            return Err(AppError::VectorStore {
                code: 700,
                message: format!("index not found[collection={}]", name),
            });
        }
        entry.loaded = true;
        Ok(())
    }

    async fn insert(&self, collection: &str, records: &[Record]) -> Result<usize, AppError> {
        let mut collections = self.collections.write().await;
        let entry = collections
            .get_mut(collection)
            .ok_or_else(|| AppError::CollectionNotFound(collection.to_string()))?;

        for record in records {
            if record.embedding.len() != entry.dimension {
                return Err(AppError::Validation(format!(
                    "record {} has dimension {}, collection expects {}",
                    record.id,
                    record.embedding.len(),
                    entry.dimension
                )));
            }
            if record.text.chars().count() > MAX_TEXT_LENGTH {
                return Err(AppError::Validation(format!(
                    "text of record {} exceeds {} characters",
                    record.id, MAX_TEXT_LENGTH
                )));
            }
        }

        entry.records.extend_from_slice(records);
        Ok(records.len())
    }

    async fn flush(&self, collection: &str) -> Result<(), AppError> {
        if !self.has_collection(collection).await? {
            return Err(AppError::CollectionNotFound(collection.to_string()));
        }
        Ok(())
    }

    async fn search(&self, request: &SearchRequest<'_>) -> Result<Vec<Document>, AppError> {
        let collections = self.collections.read().await;
        let collection = collections
            .get(request.collection)
            .ok_or_else(|| AppError::CollectionNotFound(request.collection.to_string()))?;

        if !collection.loaded {
            return Err(AppError::VectorStore {
                code: 101,
                message: format!("collection not loaded[collection={}]", request.collection),
            });
        }
        if request.vector.len() != collection.dimension {
            return Err(AppError::Validation(format!(
                "query vector has dimension {}, collection expects {}",
                request.vector.len(),
                collection.dimension
            )));
        }

        let mut scored: Vec<Document> = collection
            .records
            .iter()
            .map(|r| {
                Document::new(
                    r.id,
                    r.text.clone(),
                    score(request.metric, request.vector, &r.embedding),
                )
            })
            .collect();

        let ascending = request.metric.ascending();
        scored.sort_by(|a, b| {
            let ord = a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal);
            if ascending {
                ord
            } else {
                ord.reverse()
            }
        });
        scored.truncate(request.top_k);

        Ok(scored)
    }

    async fn disconnect(&self) -> Result<(), AppError> {
        for collection in self.collections.write().await.values_mut() {
            collection.loaded = false;
        }
        Ok(())
    }
}

/// Scores `b` against the query `a` the way Milvus reports it.
fn score(metric: MetricType, a: &[f32], b: &[f32]) -> f32 {
    match metric {
        // Milvus reports squared L2
        MetricType::L2 => a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum(),
        MetricType::Ip => dot(a, b),
        MetricType::Cosine => {
            let norm = dot(a, a).sqrt() * dot(b, b).sqrt();
            if norm == 0.0 {
                0.0
            } else {
                dot(a, b) / norm
            }
        }
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
