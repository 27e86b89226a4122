//! OpenAI chat completions and embeddings over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};

use crate::config::OpenAiConfig;
use crate::error::AppError;
use crate::llm::{ChatModel, Embedder};

/// Client for the OpenAI `/chat/completions` and `/embeddings` endpoints.
///
/// A missing API key is not an error at construction time; every request
/// fails instead, so a run without credentials still reaches the stores.
pub struct OpenAiClient {
    http: Client,
    config: OpenAiConfig,
    dimension: usize,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatContent,
}

#[derive(Deserialize)]
struct ChatContent {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl OpenAiClient {
    /// Builds a client producing `dimension`-sized embeddings.
    pub fn new(config: &OpenAiConfig, dimension: usize) -> Result<Self, AppError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            config: config.clone(),
            dimension,
        })
    }

    fn request(&self, endpoint: &str) -> Option<RequestBuilder> {
        let api_key = self.config.api_key.as_deref().filter(|k| !k.is_empty())?;
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), endpoint);
        Some(self.http.post(url).bearer_auth(api_key))
    }

    /// Sends a request and returns the body.
    ///
    /// Non-2xx responses are mapped through `to_error` with the API's message.
    async fn send(
        request: RequestBuilder,
        to_error: fn(String) -> AppError,
    ) -> Result<String, AppError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return Ok(body);
        }
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        Err(to_error(format!("{} ({})", message, status)))
    }
}

#[async_trait]
impl ChatModel for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String, AppError> {
        let request = self
            .request("chat/completions")
            .ok_or_else(|| AppError::Llm("OpenAI API key is not configured".to_string()))?
            .json(&ChatRequest {
                model: &self.config.chat_model,
                messages: vec![ChatMessage {
                    role: "user",
                    content: prompt,
                }],
                temperature: self.config.temperature,
            });

        let body = Self::send(request, AppError::Llm).await?;
        parse_chat(&body)
    }
}

#[async_trait]
impl Embedder for OpenAiClient {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, AppError> {
        self.embed_documents(&[text.to_string()])
            .await?
            .pop()
            .ok_or_else(|| AppError::Embedding("no embedding returned".to_string()))
    }

    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, AppError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = self
            .request("embeddings")
            .ok_or_else(|| AppError::Embedding("OpenAI API key is not configured".to_string()))?
            .json(&EmbeddingRequest {
                model: &self.config.embedding_model,
                input: texts,
            });

        let body = Self::send(request, AppError::Embedding).await?;
        let vectors = parse_embeddings(&body, texts.len())?;

        if let Some(bad) = vectors.iter().find(|v| v.len() != self.dimension) {
            return Err(AppError::Embedding(format!(
                "model {} returned {} dimensions, expected {}",
                self.config.embedding_model,
                bad.len(),
                self.dimension
            )));
        }
        tracing::debug!("Embedded {} texts", vectors.len());

        Ok(vectors)
    }
}

fn parse_chat(body: &str) -> Result<String, AppError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| AppError::Llm(format!("malformed chat response: {}", e)))?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| AppError::Llm("chat response has no content".to_string()))
}

/// Decodes an embeddings response, restoring input order.
fn parse_embeddings(body: &str, expected: usize) -> Result<Vec<Vec<f32>>, AppError> {
    let mut response: EmbeddingResponse = serde_json::from_str(body)
        .map_err(|e| AppError::Embedding(format!("malformed embeddings response: {}", e)))?;
    if response.data.len() != expected {
        return Err(AppError::Embedding(format!(
            "expected {} embeddings, got {}",
            expected,
            response.data.len()
        )));
    }
    response.data.sort_by_key(|d| d.index);
    Ok(response.data.into_iter().map(|d| d.embedding).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chat() {
        let body = r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"GraphRAG combines both."}}]}"#;
        assert_eq!(parse_chat(body).unwrap(), "GraphRAG combines both.");
    }

    #[test]
    fn test_parse_chat_without_choices() {
        assert!(matches!(parse_chat(r#"{"choices":[]}"#), Err(AppError::Llm(_))));
    }

    #[test]
    fn test_parse_embeddings_restores_order() {
        let body = r#"{"data":[
            {"index":1,"embedding":[0.0,1.0]},
            {"index":0,"embedding":[1.0,0.0]}
        ]}"#;
        let vectors = parse_embeddings(body, 2).unwrap();
        assert_eq!(vectors, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    }

    #[test]
    fn test_parse_embeddings_count_mismatch() {
        let body = r#"{"data":[{"index":0,"embedding":[1.0]}]}"#;
        assert!(matches!(parse_embeddings(body, 2), Err(AppError::Embedding(_))));
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_without_network() {
        let client = OpenAiClient::new(&OpenAiConfig::default(), 1536).unwrap();

        let err = client.complete("hello").await.unwrap_err();
        assert!(matches!(err, AppError::Llm(_)));

        let err = client.embed_query("hello").await.unwrap_err();
        assert!(matches!(err, AppError::Embedding(_)));
    }

    #[tokio::test]
    async fn test_empty_batch_skips_request() {
        let client = OpenAiClient::new(&OpenAiConfig::default(), 1536).unwrap();
        assert!(client.embed_documents(&[]).await.unwrap().is_empty());
    }
}
