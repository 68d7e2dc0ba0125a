//! Embedding providers.
//!
//! The pipeline treats embedding generation as a black box behind the
//! [`EmbeddingProvider`] trait:
//! - [`OpenAiEmbeddings`](crate::semantic::OpenAiEmbeddings): remote HTTP API
//! - [`LocalEmbeddingModel`]: fastembed, multilingual models only, behind the
//!   `local-embeddings` feature
//!
//! Provider failures are classified so the batch orchestrator can turn them
//! into distinct user-facing messages.

#[cfg(feature = "local-embeddings")]
use std::path::PathBuf;
#[cfg(feature = "local-embeddings")]
use std::sync::Mutex;

/// Error type for embedding operations
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("Invalid API key: {0}")]
    InvalidApiKey(String),

    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Permission denied: {0}")]
    Permission(String),

    #[error("Invalid response from provider: {0}")]
    InvalidResponse(String),

    #[error("Model initialization failed: {0}")]
    InitFailed(String),

    #[error("Invalid model name: {0}")]
    InvalidModel(String),
}

impl EmbeddingError {
    /// Whether retrying the same batch later can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            EmbeddingError::Timeout(_) | EmbeddingError::RateLimited(_) | EmbeddingError::Network(_)
        )
    }
}

/// Batch text embedding: one vector per input text, in input order.
pub trait EmbeddingProvider: Send + Sync {
    /// Model identifier recorded alongside generated embeddings.
    fn model_name(&self) -> &str;

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.embed_batch(&[text.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::InvalidResponse("No embedding returned".to_string()))
    }
}

/// Check a provider response has one vector per text.
pub(crate) fn ensure_batch_len(
    texts: usize,
    vectors: &[Vec<f32>],
) -> Result<(), EmbeddingError> {
    if texts != vectors.len() {
        return Err(EmbeddingError::InvalidResponse(format!(
            "expected {} embeddings, got {}",
            texts,
            vectors.len()
        )));
    }
    Ok(())
}

/// Wrapper around fastembed's TextEmbedding model.
/// Uses a Mutex because fastembed's embed() requires &mut self.
#[cfg(feature = "local-embeddings")]
pub struct LocalEmbeddingModel {
    model: Mutex<fastembed::TextEmbedding>,
    model_name: String,
    dimensions: usize,
}

#[cfg(feature = "local-embeddings")]
impl LocalEmbeddingModel {
    /// Load a multilingual model, downloading it into `cache_dir/models` on
    /// first use.
    pub fn new(model_name: &str, cache_dir: PathBuf) -> Result<Self, EmbeddingError> {
        let model_enum = Self::parse_model_name(model_name)?;

        let models_dir = cache_dir.join("models");
        std::fs::create_dir_all(&models_dir).map_err(|e| {
            EmbeddingError::InitFailed(format!("Failed to create models directory: {}", e))
        })?;

        let options = fastembed::InitOptions::new(model_enum)
            .with_cache_dir(models_dir)
            .with_show_download_progress(true);

        let mut model = fastembed::TextEmbedding::try_new(options)
            .map_err(|e| EmbeddingError::InitFailed(e.to_string()))?;

        let dimensions = Self::detect_dimensions(&mut model)?;
        log::info!("Loaded local embedding model {} ({} dims)", model_name, dimensions);

        Ok(Self {
            model: Mutex::new(model),
            model_name: model_name.to_string(),
            dimensions,
        })
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Guest feedback is Portuguese, so only multilingual models are accepted.
    fn parse_model_name(name: &str) -> Result<fastembed::EmbeddingModel, EmbeddingError> {
        match name.to_lowercase().as_str() {
            "multilingual-e5-small" | "multilinguale5small" => {
                Ok(fastembed::EmbeddingModel::MultilingualE5Small)
            }
            "multilingual-e5-base" | "multilinguale5base" => {
                Ok(fastembed::EmbeddingModel::MultilingualE5Base)
            }
            "multilingual-e5-large" | "multilinguale5large" => {
                Ok(fastembed::EmbeddingModel::MultilingualE5Large)
            }
            "paraphrase-multilingual-minilm-l12-v2" => {
                Ok(fastembed::EmbeddingModel::ParaphraseMLMiniLML12V2)
            }
            _ => Err(EmbeddingError::InvalidModel(format!(
                "Unknown model: {}. Supported models: multilingual-e5-small, multilingual-e5-base, multilingual-e5-large, paraphrase-multilingual-minilm-l12-v2",
                name
            ))),
        }
    }

    fn detect_dimensions(model: &mut fastembed::TextEmbedding) -> Result<usize, EmbeddingError> {
        let test_embeddings = model
            .embed(vec!["teste"], None)
            .map_err(|e| EmbeddingError::InitFailed(format!("Failed to detect dimensions: {}", e)))?;

        test_embeddings
            .first()
            .map(|v| v.len())
            .ok_or_else(|| EmbeddingError::InitFailed("Model returned no embedding".to_string()))
    }
}

#[cfg(feature = "local-embeddings")]
impl EmbeddingProvider for LocalEmbeddingModel {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let mut model = self.model.lock().map_err(|e| {
            EmbeddingError::InvalidResponse(format!("Failed to acquire model lock: {}", e))
        })?;

        let vectors = model
            .embed(texts.to_vec(), None)
            .map_err(|e| EmbeddingError::InvalidResponse(e.to_string()))?;
        ensure_batch_len(texts.len(), &vectors)?;
        Ok(vectors)
    }
}
