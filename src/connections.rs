//! Session lifecycle for the vector and graph stores.
//!
//! Both stores are required: [`Connections::open`] fails if either one
//! cannot be reached, closing whichever did connect. Teardown is
//! best-effort and never fails.

use std::sync::Arc;

use crate::config::{Config, MilvusConfig, Neo4jConfig};
use crate::context::{AppGraph, AppVectorStore};
use crate::error::AppError;
use crate::graph::backends::neo4j::Neo4jClient;
use crate::vector::milvus::MilvusClient;

/// Connects to the Milvus REST endpoint.
pub async fn connect_vector(config: &MilvusConfig) -> Result<AppVectorStore, AppError> {
    tracing::info!("Connecting to Milvus at {}", config.base_url());
    let client = MilvusClient::connect(config).await?;
    tracing::info!("Connected to Milvus");
    Ok(Arc::new(client))
}

/// Connects to Neo4j and verifies the session with a trivial query.
pub async fn connect_graph(config: &Neo4jConfig) -> Result<AppGraph, AppError> {
    tracing::info!("Connecting to Neo4j at {}", config.uri);
    let client = Neo4jClient::connect(&config.uri, &config.user, &config.password).await?;
    tracing::info!("Connected to Neo4j");
    Ok(Arc::new(client))
}

/// Open handles to both stores.
#[derive(Default)]
pub struct Connections {
    vector: Option<AppVectorStore>,
    graph: Option<AppGraph>,
}

impl Connections {
    pub fn new(vector: AppVectorStore, graph: AppGraph) -> Self {
        Self {
            vector: Some(vector),
            graph: Some(graph),
        }
    }

    /// Connects to both stores concurrently.
    pub async fn open(config: &Config) -> Result<Self, AppError> {
        let (vector, graph) = tokio::join!(
            connect_vector(&config.milvus),
            connect_graph(&config.neo4j)
        );
        Self::from_results(vector, graph).await
    }

    /// Keeps both handles, or closes the survivor and returns the first error.
    async fn from_results(
        vector: Result<AppVectorStore, AppError>,
        graph: Result<AppGraph, AppError>,
    ) -> Result<Self, AppError> {
        if let Err(e) = &vector {
            tracing::error!("Failed to connect to Milvus: {}", e);
        }
        if let Err(e) = &graph {
            tracing::error!("Failed to connect to Neo4j: {}", e);
        }

        match (vector, graph) {
            (Ok(vector), Ok(graph)) => Ok(Self::new(vector, graph)),
            (vector, graph) => {
                let mut partial = Self {
                    vector: vector.as_ref().ok().cloned(),
                    graph: graph.as_ref().ok().cloned(),
                };
                partial.close().await;
                Err(vector.err().or(graph.err()).unwrap_or_else(|| {
                    AppError::Internal("connection failed without an error".to_string())
                }))
            }
        }
    }

    pub fn vector(&self) -> Result<&AppVectorStore, AppError> {
        self.vector.as_ref().ok_or(AppError::NotConnected("Milvus"))
    }

    pub fn graph(&self) -> Result<&AppGraph, AppError> {
        self.graph.as_ref().ok_or(AppError::NotConnected("Neo4j"))
    }

    pub fn is_open(&self) -> bool {
        self.vector.is_some() || self.graph.is_some()
    }

    /// Disconnects both stores.
    ///
    /// Each failure is logged and swallowed. Handles are dropped either way,
    /// so a second call does nothing.
    pub async fn close(&mut self) {
        if let Some(vector) = self.vector.take() {
            match vector.disconnect().await {
                Ok(()) => tracing::info!("Disconnected from Milvus"),
                Err(e) => tracing::warn!("Error while disconnecting from Milvus: {}", e),
            }
        }
        if let Some(graph) = self.graph.take() {
            match graph.close().await {
                Ok(()) => tracing::info!("Closed Neo4j driver"),
                Err(e) => tracing::warn!("Error while closing Neo4j driver: {}", e),
            }
        }
    }
}
