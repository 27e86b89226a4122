//! The GraphRAG agent: store setup, hybrid retrieval and answer synthesis.
//!
//! # Example
//!
//! ```ignore
//! let mut agent = GraphRagAgent::connect(Config::load()?).await?;
//! agent.initialize("sample_collection").await?;
//! agent.seed("sample_collection").await?;
//!
//! let result = agent.query("What is GraphRAG?", "sample_collection").await?;
//! println!("{}", result.answer);
//!
//! agent.close().await;
//! ```

use std::sync::Arc;

use crate::chain::CypherQaChain;
use crate::config::Config;
use crate::context::{AppGraph, AppVectorStore, Context};
use crate::error::AppError;
use crate::models::QueryResult;
use crate::schema::{create_collection, init_graph_schema, seed_graph, seed_vector_store};
use crate::services::{RetrievalService, SynthesisService};
use crate::vector::CollectionSpec;

/// Answers questions from a vector store and a graph store together.
pub struct GraphRagAgent {
    context: Context,
    chain: Arc<CypherQaChain>,
    retrieval: RetrievalService,
    synthesis: SynthesisService,
}

impl GraphRagAgent {
    /// Connects to both stores using `config`.
    pub async fn connect(config: Config) -> Result<Self, AppError> {
        Self::new(Context::connect(config).await?)
    }

    /// Builds the agent over an open context.
    pub fn new(context: Context) -> Result<Self, AppError> {
        let vector = context.connections.vector()?.clone();
        let graph = context.connections.graph()?.clone();

        let chain = Arc::new(CypherQaChain::new(
            graph,
            context.llm.clone(),
            context.config.graph_qa.clone(),
        ));
        let retrieval = RetrievalService::new(
            vector,
            context.embedder.clone(),
            chain.clone(),
            context.config.collection.clone(),
        );
        let synthesis = SynthesisService::new(context.llm.clone());

        Ok(Self {
            context,
            chain,
            retrieval,
            synthesis,
        })
    }

    pub fn config(&self) -> &Config {
        &self.context.config
    }

    fn vector(&self) -> Result<&AppVectorStore, AppError> {
        self.context.connections.vector()
    }

    fn graph(&self) -> Result<&AppGraph, AppError> {
        self.context.connections.graph()
    }

    /// Declares graph constraints and creates `collection` with its index.
    ///
    /// Fails with [`AppError::CollectionExists`] if the collection is already
    /// there; the graph constraints are in place either way. A collection
    /// whose dimension differs from the embedder's is never created.
    pub async fn initialize(&self, collection: &str) -> Result<(), AppError> {
        let spec = CollectionSpec::from_config(collection, &self.config().collection);
        let embedder_dimension = self.context.embedder.dimension();
        if spec.dimension != embedder_dimension {
            return Err(AppError::Validation(format!(
                "collection dimension {} does not match embedding dimension {}",
                spec.dimension, embedder_dimension
            )));
        }

        init_graph_schema(self.graph()?.as_ref()).await?;
        create_collection(self.vector()?.as_ref(), &spec).await
    }

    /// Loads the demo passages into `collection` and the demo topics into the graph.
    pub async fn seed(&self, collection: &str) -> Result<(), AppError> {
        self.seed_vectors(collection).await?;
        self.seed_graph().await
    }

    /// Embeds and inserts the demo passages.
    pub async fn seed_vectors(&self, collection: &str) -> Result<usize, AppError> {
        seed_vector_store(
            self.vector()?.as_ref(),
            self.context.embedder.as_ref(),
            collection,
        )
        .await
    }

    /// Merges the demo topics and refreshes the schema shown to the model.
    pub async fn seed_graph(&self) -> Result<(), AppError> {
        seed_graph(self.graph()?.as_ref()).await?;
        self.chain.refresh_schema().await?;
        Ok(())
    }

    /// Answers `query` with the configured number of passages.
    pub async fn query(&self, query: &str, collection: &str) -> Result<QueryResult, AppError> {
        self.query_top_k(query, collection, self.config().collection.top_k)
            .await
    }

    /// Answers `query` using at most `top_k` passages.
    ///
    /// Retrieval failures are reported in the result; only synthesis errors
    /// are returned as `Err`.
    pub async fn query_top_k(
        &self,
        query: &str,
        collection: &str,
        top_k: usize,
    ) -> Result<QueryResult, AppError> {
        if query.trim().is_empty() {
            return Err(AppError::Validation("query must not be empty".to_string()));
        }
        tracing::info!("Query: {}", query);

        let (vector, graph) = self.retrieval.retrieve(query, collection, top_k).await;
        self.synthesis.answer(query, vector, graph).await
    }

    /// Disconnects both stores. Safe to call more than once.
    pub async fn close(&mut self) {
        self.context.connections.close().await;
    }
}
