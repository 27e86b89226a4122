//! Language model seams.
//!
//! - [`ChatModel`] - single-turn text completion
//! - [`Embedder`] - text to fixed-dimension vectors
//!
//! [`openai::OpenAiClient`] implements both against the OpenAI HTTP API.

pub mod openai;

use async_trait::async_trait;

use crate::error::AppError;

/// A generative model answering a single prompt.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Returns the model's reply to `prompt`.
    async fn complete(&self, prompt: &str) -> Result<String, AppError>;
}

/// A text embedding model.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Dimension of every vector this model produces.
    fn dimension(&self) -> usize;

    /// Embeds a search query.
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, AppError>;

    /// Embeds passages, one vector per input in input order.
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, AppError>;
}
