use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::classifier::RecallSettings;
use crate::orchestrator::{GenerationOptions, BATCH_SIZE, CHUNK_SIZE};
use crate::rerank::RerankWeights;
use crate::semantic::{openai::DEFAULT_API_URL, DEFAULT_LOCAL_MODEL, DEFAULT_MODEL};

pub const CONFIG_FILE: &str = "config.yaml";

/// Default provider request timeout in seconds
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config is malformed: {0}")]
    Malformed(#[from] serde_yml::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Openai,
    Local,
}

/// Embedding provider settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default)]
    pub provider: ProviderKind,

    /// Remote model name
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// fastembed model used when `provider` is `local`
    #[serde(default = "default_local_model")]
    pub local_model: String,

    /// Texts per provider request
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            model: default_model(),
            api_url: default_api_url(),
            local_model: default_local_model(),
            batch_size: BATCH_SIZE,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_local_model() -> String {
    DEFAULT_LOCAL_MODEL.to_string()
}

fn default_batch_size() -> usize {
    BATCH_SIZE
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Records per chunk document
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
        }
    }
}

fn default_chunk_size() -> usize {
    CHUNK_SIZE
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecallConfig {
    #[serde(default = "default_keyword_threshold")]
    pub keyword_threshold: f32,
    #[serde(default = "default_keyword_fallback_threshold")]
    pub keyword_fallback_threshold: f32,
    #[serde(default = "default_problem_threshold")]
    pub problem_threshold: f32,
    #[serde(default = "default_problem_fallback_threshold")]
    pub problem_fallback_threshold: f32,
    #[serde(default = "default_min_candidates")]
    pub min_candidates: usize,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for RecallConfig {
    fn default() -> Self {
        let defaults = RecallSettings::default();
        Self {
            keyword_threshold: defaults.keyword_threshold,
            keyword_fallback_threshold: defaults.keyword_fallback_threshold,
            problem_threshold: defaults.problem_threshold,
            problem_fallback_threshold: defaults.problem_fallback_threshold,
            min_candidates: defaults.min_candidates,
            top_n: defaults.top_n,
        }
    }
}

fn default_keyword_threshold() -> f32 {
    RecallSettings::default().keyword_threshold
}

fn default_keyword_fallback_threshold() -> f32 {
    RecallSettings::default().keyword_fallback_threshold
}

fn default_problem_threshold() -> f32 {
    RecallSettings::default().problem_threshold
}

fn default_problem_fallback_threshold() -> f32 {
    RecallSettings::default().problem_fallback_threshold
}

fn default_min_candidates() -> usize {
    RecallSettings::default().min_candidates
}

fn default_top_n() -> usize {
    RecallSettings::default().top_n
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RerankingConfig {
    #[serde(default)]
    pub weights: RerankWeights,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub recall: RecallConfig,
    #[serde(default)]
    pub reranking: RerankingConfig,

    #[serde(skip_serializing, skip_deserializing)]
    base_path: PathBuf,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.embedding.batch_size == 0 {
            return Err(ConfigError::Invalid(
                "embedding.batch_size must be greater than 0".to_string(),
            ));
        }

        if self.embedding.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "embedding.request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.storage.chunk_size == 0 {
            return Err(ConfigError::Invalid(
                "storage.chunk_size must be greater than 0".to_string(),
            ));
        }

        let recall = &self.recall;
        let thresholds = [
            ("keyword_threshold", recall.keyword_threshold),
            ("keyword_fallback_threshold", recall.keyword_fallback_threshold),
            ("problem_threshold", recall.problem_threshold),
            ("problem_fallback_threshold", recall.problem_fallback_threshold),
        ];
        for (name, value) in thresholds {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "recall.{name} must be between 0.0 and 1.0, got {value}"
                )));
            }
        }

        if recall.keyword_fallback_threshold > recall.keyword_threshold
            || recall.problem_fallback_threshold > recall.problem_threshold
        {
            return Err(ConfigError::Invalid(
                "recall fallback thresholds must not exceed their main thresholds".to_string(),
            ));
        }

        if recall.top_n == 0 {
            return Err(ConfigError::Invalid(
                "recall.top_n must be greater than 0".to_string(),
            ));
        }

        let weights = &self.reranking.weights;
        if !weights.is_valid() {
            return Err(ConfigError::Invalid(format!(
                "reranking.weights must be non-negative and sum to 1.0, got {:.6}",
                weights.sum()
            )));
        }

        Ok(())
    }

    /// Load `config.yaml` from `base_path`, writing defaults when absent.
    pub fn load_with(base_path: &Path) -> Result<Self, ConfigError> {
        let path = base_path.join(CONFIG_FILE);
        let io_error = |source| ConfigError::Io {
            path: path.clone(),
            source,
        };

        // create new if does not exist
        if !path.exists() {
            std::fs::create_dir_all(base_path).map_err(io_error)?;
            std::fs::write(&path, serde_yml::to_string(&Self::default())?).map_err(io_error)?;
        }

        let config_str = std::fs::read_to_string(&path).map_err(io_error)?;
        let mut config: Self = serde_yml::from_str(&config_str)?;
        config.base_path = base_path.to_path_buf();

        config.validate()?;

        // resave in case config version needs an upgrade
        if config_str != serde_yml::to_string(&config)? {
            config.save()?;
        }

        Ok(config)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let path = self.base_path.join(CONFIG_FILE);
        let config_str = serde_yml::to_string(&self)?;
        std::fs::write(&path, config_str).map_err(|source| ConfigError::Io { path, source })
    }

    pub fn recall_settings(&self) -> RecallSettings {
        RecallSettings {
            keyword_threshold: self.recall.keyword_threshold,
            keyword_fallback_threshold: self.recall.keyword_fallback_threshold,
            problem_threshold: self.recall.problem_threshold,
            problem_fallback_threshold: self.recall.problem_fallback_threshold,
            min_candidates: self.recall.min_candidates,
            top_n: self.recall.top_n,
        }
    }

    pub fn generation_options(&self) -> GenerationOptions {
        GenerationOptions {
            batch_size: self.embedding.batch_size,
            chunk_size: self.storage.chunk_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_with(dir.path()).unwrap();

        assert!(dir.path().join(CONFIG_FILE).is_file());
        assert_eq!(config.embedding.provider, ProviderKind::Openai);
        assert_eq!(config.embedding.batch_size, 20);
        assert_eq!(config.storage.chunk_size, 50);
        assert_eq!(config.reranking.weights, RerankWeights::default());
    }

    #[test]
    fn test_partial_file_gets_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "embedding:\n  provider: local\nrecall:\n  top_n: 5\n",
        )
        .unwrap();

        let config = Config::load_with(dir.path()).unwrap();
        assert_eq!(config.embedding.provider, ProviderKind::Local);
        assert_eq!(config.embedding.local_model, DEFAULT_LOCAL_MODEL);
        assert_eq!(config.recall.top_n, 5);
        assert_eq!(config.recall_settings().keyword_threshold, 0.30);

        // upgraded file now lists every field
        let saved = std::fs::read_to_string(dir.path().join(CONFIG_FILE)).unwrap();
        assert!(saved.contains("chunk_size"));
    }

    #[test]
    fn test_rejects_bad_weights() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "reranking:\n  weights: { embedding: 0.5, structural: 0.5, frequency: 0.5, context: 0.0 }\n",
        )
        .unwrap();

        assert!(matches!(
            Config::load_with(dir.path()),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_partial_weights_get_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "reranking:\n  weights: { embedding: 0.5, structural: 0.2 }\n",
        )
        .unwrap();

        let weights = Config::load_with(dir.path()).unwrap().reranking.weights;
        assert_eq!(weights.embedding, 0.5);
        assert_eq!(weights.structural, 0.2);
        assert_eq!(weights.frequency, RerankWeights::default().frequency);
        assert_eq!(weights.context, RerankWeights::default().context);
    }

    #[test]
    fn test_rejects_threshold_out_of_range() {
        let mut config = Config::default();
        config.recall.problem_threshold = 1.5;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_zero_sizes() {
        let mut config = Config::default();
        config.storage.chunk_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.embedding.batch_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_yaml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "embedding: [unclosed").unwrap();
        assert!(matches!(
            Config::load_with(dir.path()),
            Err(ConfigError::Malformed(_))
        ));
    }
}
