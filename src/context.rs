//! Application context: the composition root.

use std::sync::Arc;

use crate::config::Config;
use crate::connections::Connections;
use crate::error::AppError;
use crate::graph::GraphClient;
use crate::llm::openai::OpenAiClient;
use crate::llm::{ChatModel, Embedder};
use crate::vector::VectorStore;

/// Shared vector store handle.
pub type AppVectorStore = Arc<dyn VectorStore>;
/// Shared graph store handle.
pub type AppGraph = Arc<dyn GraphClient>;
/// Shared embedding model.
pub type AppEmbedder = Arc<dyn Embedder>;
/// Shared chat model.
pub type AppChatModel = Arc<dyn ChatModel>;

/// Everything a query pass needs, built once from [`Config`].
pub struct Context {
    pub config: Arc<Config>,
    pub connections: Connections,
    pub embedder: AppEmbedder,
    pub llm: AppChatModel,
}

impl Context {
    /// Creates a context from already-built dependencies.
    pub fn new(
        config: Config,
        connections: Connections,
        embedder: AppEmbedder,
        llm: AppChatModel,
    ) -> Self {
        Self {
            config: Arc::new(config),
            connections,
            embedder,
            llm,
        }
    }

    /// Connects to both stores and builds the OpenAI client.
    pub async fn connect(config: Config) -> Result<Self, AppError> {
        let openai = Arc::new(OpenAiClient::new(&config.openai, config.collection.dimension)?);
        let connections = Connections::open(&config).await?;
        Ok(Self::new(config, connections, openai.clone(), openai))
    }
}
