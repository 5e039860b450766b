//! Client for OpenAI-compatible `/embeddings` endpoints.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use crate::embedding::EmbeddingProvider;
use crate::error::SiftError;

/// Connection settings for [`OpenAiEmbedder`].
#[derive(Debug, Clone)]
pub struct EmbedderConfig {
    /// Base URL, e.g. `https://api.openai.com/v1` or `http://localhost:11434/v1`.
    pub base_url: String,
    pub model: String,
    /// Sent as a bearer token when present. Local servers usually need none.
    pub api_key: Option<String>,
    pub dimensions: Option<usize>,
    pub timeout: Duration,
    /// Max inputs per request.
    pub batch_size: usize,
}

/// Blocking embeddings client. Failed requests are not retried.
pub struct OpenAiEmbedder {
    client: Client,
    endpoint: String,
    model: String,
    dimensions: Option<usize>,
    batch_size: usize,
}

impl OpenAiEmbedder {
    pub fn new(config: EmbedderConfig) -> Result<Self, SiftError> {
        if config.model.trim().is_empty() {
            return Err(SiftError::Embedding("missing embedding model name".into()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = config.api_key.as_deref().map(str::trim) {
            if !key.is_empty() {
                let value = HeaderValue::from_str(&format!("Bearer {key}"))
                    .map_err(|_| SiftError::Embedding("invalid API key".into()))?;
                headers.insert(AUTHORIZATION, value);
            }
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| SiftError::Embedding(format!("failed to build HTTP client: {e}")))?;

        Ok(OpenAiEmbedder {
            client,
            endpoint: embeddings_endpoint(&config.base_url),
            model: config.model,
            dimensions: config.dimensions,
            batch_size: config.batch_size.max(1),
        })
    }

    fn embed_batch(&self, inputs: &[&str]) -> Result<Vec<Vec<f32>>, SiftError> {
        let request = EmbeddingRequest {
            model: &self.model,
            input: inputs,
            dimensions: self.dimensions,
        };
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .map_err(|e| SiftError::Embedding(format!("request to {} failed: {e}", self.endpoint)))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(SiftError::Embedding(format!(
                "embeddings request failed ({status}): {body}"
            )));
        }

        let parsed: EmbeddingResponse = resp
            .json()
            .map_err(|e| SiftError::Embedding(format!("failed to parse embedding response: {e}")))?;
        into_ordered_vectors(parsed, inputs.len())
    }
}

impl EmbeddingProvider for OpenAiEmbedder {
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, SiftError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size) {
            tracing::debug!(size = batch.len(), "requesting embeddings");
            vectors.extend(self.embed_batch(batch)?);
        }
        Ok(vectors)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

fn embeddings_endpoint(base_url: &str) -> String {
    format!("{}/embeddings", base_url.trim_end_matches('/'))
}

fn into_ordered_vectors(
    mut parsed: EmbeddingResponse,
    expected: usize,
) -> Result<Vec<Vec<f32>>, SiftError> {
    parsed.data.sort_by_key(|entry| entry.index);
    if parsed.data.len() != expected {
        return Err(SiftError::Embedding(format!(
            "endpoint returned {} embeddings for {} inputs",
            parsed.data.len(),
            expected
        )));
    }
    Ok(parsed.data.into_iter().map(|e| e.embedding).collect())
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}
