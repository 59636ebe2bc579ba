use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use cortex_core::errors::{CortexResult, EmbeddingError};
use cortex_core::traits::EmbeddingProvider;

/// Adapter for any embeddings endpoint that speaks the OpenAI
/// `/embeddings` request/response shape (OpenAI itself, and most
/// self-hosted servers that mirror it).
pub struct OpenAiCompatibleEmbeddingProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    dimensions: usize,
    max_retries: u32,
}

impl OpenAiCompatibleEmbeddingProvider {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        dimensions: usize,
        request_timeout_ms: u64,
        max_retries: u32,
    ) -> CortexResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(request_timeout_ms))
            .build()
            .map_err(|e| EmbeddingError::Request { message: e.to_string() })?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
            api_key,
            dimensions,
            max_retries,
        })
    }

    async fn call(&self, input: EmbeddingInput<'_>) -> CortexResult<EmbeddingResponse> {
        let url = format!("{}/embeddings", self.base_url.trim_end_matches('/'));
        let mut attempt = 0;
        loop {
            let mut req = self.client.post(&url).json(&EmbeddingRequest {
                model: &self.model,
                input: input.clone(),
            });
            if let Some(key) = &self.api_key {
                req = req.bearer_auth(key);
            }
            match req.send().await {
                Ok(resp) if resp.status().is_success() => {
                    return resp
                        .json::<EmbeddingResponse>()
                        .await
                        .map_err(|e| EmbeddingError::Request { message: e.to_string() }.into());
                }
                Ok(resp) => {
                    let status = resp.status();
                    if attempt >= self.max_retries {
                        return Err(EmbeddingError::Unavailable {
                            message: format!("embedding endpoint returned {status}"),
                        }
                        .into());
                    }
                    tracing::warn!(%status, attempt, "embedding request failed, retrying");
                }
                Err(e) => {
                    if attempt >= self.max_retries {
                        return Err(EmbeddingError::Unavailable { message: e.to_string() }.into());
                    }
                    tracing::warn!(error = %e, attempt, "embedding request failed, retrying");
                }
            }
            attempt += 1;
            tokio::time::sleep(std::time::Duration::from_millis(200 * attempt as u64)).await;
        }
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: EmbeddingInput<'a>,
}

#[derive(Serialize, Clone)]
#[serde(untagged)]
enum EmbeddingInput<'a> {
    One(&'a str),
    Many(&'a [String]),
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
    embedding: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for OpenAiCompatibleEmbeddingProvider {
    async fn embed(&self, text: &str) -> CortexResult<Vec<f32>> {
        let resp = self.call(EmbeddingInput::One(text)).await?;
        let datum = resp
            .data
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::Request { message: "empty embedding response".to_string() })?;
        if datum.embedding.len() != self.dimensions {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimensions,
                got: datum.embedding.len(),
            }
            .into());
        }
        Ok(datum.embedding)
    }

    async fn embed_batch(&self, texts: &[String]) -> CortexResult<Vec<Vec<f32>>> {
        let resp = self.call(EmbeddingInput::Many(texts)).await?;
        Ok(resp.data.into_iter().map(|d| d.embedding).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
