//! Remote embedding provider speaking the OpenAI `/v1/embeddings` protocol.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::semantic::embeddings::{ensure_batch_len, EmbeddingError, EmbeddingProvider};

pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/embeddings";

pub struct OpenAiEmbeddings {
    client: reqwest::blocking::Client,
    api_url: String,
    api_key: String,
    model: String,
    timeout_secs: u64,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Deserialize, Default)]
struct ErrorEnvelope {
    #[serde(default)]
    error: ErrorBody,
}

#[derive(Deserialize, Default)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

impl OpenAiEmbeddings {
    pub fn new(
        api_url: &str,
        api_key: &str,
        model: &str,
        timeout_secs: u64,
    ) -> Result<Self, EmbeddingError> {
        if api_key.trim().is_empty() {
            return Err(EmbeddingError::InvalidApiKey("API key is empty".to_string()));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| EmbeddingError::InitFailed(e.to_string()))?;

        Ok(Self {
            client,
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            timeout_secs,
        })
    }

    fn classify_transport(&self, err: reqwest::Error) -> EmbeddingError {
        if err.is_timeout() {
            EmbeddingError::Timeout(self.timeout_secs)
        } else if err.is_decode() {
            EmbeddingError::InvalidResponse(err.to_string())
        } else {
            EmbeddingError::Network(err.to_string())
        }
    }
}

/// Map a non-success HTTP status and its body to a classified error.
pub fn classify_status(status: u16, body: &str) -> EmbeddingError {
    let envelope: ErrorEnvelope = serde_json::from_str(body).unwrap_or_default();
    let message = if envelope.error.message.is_empty() {
        format!("HTTP {}", status)
    } else {
        envelope.error.message
    };
    let quota = [envelope.error.code.as_deref(), envelope.error.kind.as_deref()]
        .iter()
        .flatten()
        .any(|c| *c == "insufficient_quota")
        || message.to_lowercase().contains("quota");

    match status {
        401 => EmbeddingError::InvalidApiKey(message),
        403 => EmbeddingError::Permission(message),
        429 if quota => EmbeddingError::QuotaExceeded(message),
        429 => EmbeddingError::RateLimited(message),
        408 | 504 => EmbeddingError::Network(message),
        _ if quota => EmbeddingError::QuotaExceeded(message),
        s if s >= 500 => EmbeddingError::Network(message),
        _ => EmbeddingError::InvalidResponse(message),
    }
}

impl EmbeddingProvider for OpenAiEmbeddings {
    fn model_name(&self) -> &str {
        &self.model
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&EmbeddingRequest {
                model: &self.model,
                input: texts,
            })
            .send()
            .map_err(|e| self.classify_transport(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let err = classify_status(status.as_u16(), &body);
            log::warn!("Embedding request failed ({}): {}", status, err);
            return Err(err);
        }

        let mut parsed: EmbeddingResponse =
            response.json().map_err(|e| self.classify_transport(e))?;
        parsed.data.sort_by_key(|d| d.index);

        let vectors: Vec<Vec<f32>> = parsed.data.into_iter().map(|d| d.embedding).collect();
        ensure_batch_len(texts.len(), &vectors)?;
        log::debug!("Embedded {} texts with {}", texts.len(), self.model);
        Ok(vectors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_key_rejected() {
        let result = OpenAiEmbeddings::new(DEFAULT_API_URL, "  ", "text-embedding-3-small", 30);
        assert!(matches!(result, Err(EmbeddingError::InvalidApiKey(_))));
    }

    #[test]
    fn test_classify_status() {
        let body = r#"{"error": {"message": "Incorrect API key provided", "code": "invalid_api_key"}}"#;
        assert!(matches!(classify_status(401, body), EmbeddingError::InvalidApiKey(m) if m.contains("Incorrect")));
        assert!(matches!(classify_status(403, ""), EmbeddingError::Permission(_)));
        assert!(matches!(classify_status(429, "{}"), EmbeddingError::RateLimited(_)));
        assert!(matches!(classify_status(502, "bad gateway"), EmbeddingError::Network(_)));
        assert!(matches!(classify_status(400, "{}"), EmbeddingError::InvalidResponse(_)));
    }

    #[test]
    fn test_classify_quota() {
        let body = r#"{"error": {"message": "You exceeded your current quota", "type": "insufficient_quota"}}"#;
        assert!(matches!(classify_status(429, body), EmbeddingError::QuotaExceeded(_)));
    }

    #[test]
    fn test_empty_batch_skips_request() {
        let provider =
            OpenAiEmbeddings::new("http://127.0.0.1:9/v1/embeddings", "sk-test", "m", 1).unwrap();
        assert!(provider.embed_batch(&[]).unwrap().is_empty());
    }

    #[test]
    #[ignore = "requires network access and OPENAI_API_KEY"]
    fn test_remote_embedding() {
        let key = std::env::var("OPENAI_API_KEY").unwrap();
        let provider =
            OpenAiEmbeddings::new(DEFAULT_API_URL, &key, "text-embedding-3-small", 30).unwrap();
        let vector = provider.embed("café da manhã").unwrap();
        assert_eq!(vector.len(), 1536);
    }
}
