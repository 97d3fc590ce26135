//! Gemini embeddings implementation.

use super::Embedder;
use crate::error::{Result, TychoError};
use crate::gemini::{api_key, create_client, API_BASE_URL};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Gemini-based embedder using the Generative Language REST API.
pub struct GeminiEmbedder {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    dimensions: usize,
}

#[derive(Serialize)]
struct EmbedContent<'a> {
    parts: Vec<EmbedPart<'a>>,
}

#[derive(Serialize)]
struct EmbedPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    content: EmbedContent<'a>,
}

#[derive(Serialize)]
struct BatchEmbedRequest<'a> {
    requests: Vec<EmbedRequest<'a>>,
}

#[derive(Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

#[derive(Deserialize)]
struct BatchEmbedResponse {
    embeddings: Vec<EmbeddingValues>,
}

impl GeminiEmbedder {
    /// Create a new Gemini embedder.
    ///
    /// Fails if no API key is configured in the environment.
    pub fn new(model: &str, dimensions: usize) -> Result<Self> {
        Ok(Self {
            client: create_client(),
            api_key: api_key()?,
            base_url: API_BASE_URL.to_string(),
            model: model.to_string(),
            dimensions,
        })
    }

    /// Override the API base URL (used for tests).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl Embedder for GeminiEmbedder {
    #[instrument(skip(self, text))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| TychoError::Embedding("Empty embedding response".to_string()))
    }

    #[instrument(skip(self, texts), fields(count = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Generating embeddings for {} texts", texts.len());

        // The batch endpoint caps the number of requests per call.
        const BATCH_SIZE: usize = 100;
        let url = format!(
            "{}/{}:batchEmbedContents?key={}",
            self.base_url, self.model, self.api_key
        );

        let mut all_embeddings = Vec::with_capacity(texts.len());

        for chunk in texts.chunks(BATCH_SIZE) {
            let request = BatchEmbedRequest {
                requests: chunk
                    .iter()
                    .map(|text| EmbedRequest {
                        model: &self.model,
                        content: EmbedContent {
                            parts: vec![EmbedPart { text }],
                        },
                    })
                    .collect(),
            };

            let response = self.client.post(&url).json(&request).send().await?;
            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(TychoError::Embedding(format!(
                    "Embedding API error: {} - {}",
                    status, body
                )));
            }

            let parsed: BatchEmbedResponse = response.json().await?;
            if parsed.embeddings.len() != chunk.len() {
                return Err(TychoError::Embedding(format!(
                    "Embedding API returned {} embeddings for {} texts",
                    parsed.embeddings.len(),
                    chunk.len()
                )));
            }

            for embedding in parsed.embeddings {
                all_embeddings.push(embedding.values);
            }
        }

        debug!("Generated {} embeddings", all_embeddings.len());
        Ok(all_embeddings)
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_request_shape() {
        let texts = ["lunar habitats".to_string()];
        let request = BatchEmbedRequest {
            requests: texts
                .iter()
                .map(|text| EmbedRequest {
                    model: "models/embedding-001",
                    content: EmbedContent {
                        parts: vec![EmbedPart { text }],
                    },
                })
                .collect(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["requests"][0]["model"], "models/embedding-001");
        assert_eq!(
            json["requests"][0]["content"]["parts"][0]["text"],
            "lunar habitats"
        );
    }
}
