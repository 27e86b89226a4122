//! Vector and graph retrieval legs.

use std::sync::Arc;

use crate::chain::CypherQaChain;
use crate::config::CollectionConfig;
use crate::context::{AppEmbedder, AppVectorStore};
use crate::error::AppError;
use crate::models::{Document, GraphAnswer, LegOutcome};
use crate::vector::SearchRequest;

/// Runs both retrieval legs for a query.
///
/// Leg failures never propagate: they are logged and returned as
/// [`LegOutcome::Failed`].
#[derive(Clone)]
pub struct RetrievalService {
    vector: AppVectorStore,
    embedder: AppEmbedder,
    chain: Arc<CypherQaChain>,
    settings: CollectionConfig,
}

impl RetrievalService {
    pub fn new(
        vector: AppVectorStore,
        embedder: AppEmbedder,
        chain: Arc<CypherQaChain>,
        settings: CollectionConfig,
    ) -> Self {
        Self {
            vector,
            embedder,
            chain,
            settings,
        }
    }

    async fn try_vector_search(
        &self,
        query: &str,
        collection: &str,
        top_k: usize,
    ) -> Result<Vec<Document>, AppError> {
        let embedding = self.embedder.embed_query(query).await?;
        self.vector.load_collection(collection).await?;
        self.vector
            .search(&SearchRequest {
                collection,
                vector: &embedding,
                top_k,
                metric: self.settings.metric,
                nprobe: self.settings.nprobe,
            })
            .await
    }

    /// Top-k passages closest to `query`, in the store's native order.
    pub async fn vector_search(
        &self,
        query: &str,
        collection: &str,
        top_k: usize,
    ) -> LegOutcome<Vec<Document>> {
        let result = self.try_vector_search(query, collection, top_k).await;
        match &result {
            Ok(docs) => tracing::debug!("Vector search returned {} passages", docs.len()),
            Err(e) => tracing::warn!("Vector search failed: {}", e),
        }
        result.into()
    }

    /// Answer to `query` from the graph store.
    pub async fn graph_search(&self, query: &str) -> LegOutcome<GraphAnswer> {
        let result = self.chain.run(query).await;
        if let Err(e) = &result {
            tracing::warn!("Graph search failed: {}", e);
        }
        result.into()
    }

    /// Runs both legs concurrently and waits for both.
    pub async fn retrieve(
        &self,
        query: &str,
        collection: &str,
        top_k: usize,
    ) -> (LegOutcome<Vec<Document>>, LegOutcome<GraphAnswer>) {
        tokio::join!(
            self.vector_search(query, collection, top_k),
            self.graph_search(query)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GraphQaConfig;
    use crate::schema::{create_collection, seed_vector_store};
    use crate::testing::{row, KeywordEmbedder, ScriptedChat, StubGraph};
    use crate::vector::memory::MemoryVectorStore;
    use crate::vector::CollectionSpec;
    use serde_json::json;

    fn settings() -> CollectionConfig {
        CollectionConfig {
            dimension: 3,
            ..CollectionConfig::default()
        }
    }

    async fn seeded_store() -> Arc<MemoryVectorStore> {
        let store = Arc::new(MemoryVectorStore::new());
        let spec = CollectionSpec::from_config("sample_collection", &settings());
        create_collection(store.as_ref(), &spec).await.unwrap();
        seed_vector_store(store.as_ref(), &KeywordEmbedder::default(), "sample_collection")
            .await
            .unwrap();
        store
    }

    fn service(
        store: Arc<MemoryVectorStore>,
        embedder: KeywordEmbedder,
        graph: StubGraph,
    ) -> RetrievalService {
        let llm = Arc::new(ScriptedChat::graph_rag(
            "MATCH (:Topic {name: 'GraphRAG'})-[:USES]->(t) RETURN t.name AS name",
            "GraphRAG uses Neo4j and Milvus.",
            "unused",
        ));
        let chain = CypherQaChain::new(Arc::new(graph), llm, GraphQaConfig::default());
        RetrievalService::new(store, Arc::new(embedder), Arc::new(chain), settings())
    }

    fn uses_rows() -> Vec<crate::graph::Row> {
        vec![row(&[("name", json!("Neo4j"))]), row(&[("name", json!("Milvus"))])]
    }

    #[tokio::test]
    async fn test_closest_passage_first() {
        let service = service(
            seeded_store().await,
            KeywordEmbedder::default(),
            StubGraph::default(),
        );

        let docs = service
            .vector_search("What is GraphRAG?", "sample_collection", 3)
            .await;
        let docs = docs.success().unwrap();

        assert_eq!(docs.len(), 3);
        assert!(docs[0].text.starts_with("GraphRAG is"));
        assert_eq!(docs[0].score, 0.0);
        assert!(docs.windows(2).all(|w| w[0].score <= w[1].score));
    }

    #[tokio::test]
    async fn test_top_k_respected() {
        let service = service(
            seeded_store().await,
            KeywordEmbedder::default(),
            StubGraph::default(),
        );
        let docs = service.vector_search("Milvus", "sample_collection", 1).await;
        assert_eq!(docs.success().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_collection_is_soft_failure() {
        let service = service(
            Arc::new(MemoryVectorStore::new()),
            KeywordEmbedder::default(),
            StubGraph::default(),
        );
        let outcome = service.vector_search("What is GraphRAG?", "missing", 3).await;
        assert!(outcome.reason().unwrap().contains("missing"));
    }

    #[tokio::test]
    async fn test_vector_failure_keeps_graph_answer() {
        let service = service(
            seeded_store().await,
            KeywordEmbedder { failing: true },
            StubGraph::with_rows(uses_rows()),
        );

        let (vector, graph) = service
            .retrieve("Which databases does GraphRAG use?", "sample_collection", 3)
            .await;

        assert!(!vector.is_success());
        assert_eq!(graph.success().unwrap().answer, "GraphRAG uses Neo4j and Milvus.");
    }

    #[tokio::test]
    async fn test_graph_failure_keeps_vector_results() {
        let service = service(
            seeded_store().await,
            KeywordEmbedder::default(),
            StubGraph::unreachable(),
        );

        let (vector, graph) = service
            .retrieve("What is GraphRAG?", "sample_collection", 3)
            .await;

        assert_eq!(vector.success().unwrap().len(), 3);
        assert!(graph.reason().unwrap().contains("Neo4j"));
    }
}
