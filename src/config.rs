//! Configuration management for the fake job detector

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Where inference runs
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum InferenceStrategy {
    /// Execute the exported graph model in-process via ONNX Runtime
    #[default]
    Local,
    /// POST the raw form text to a prediction endpoint
    Remote,
}

/// Element type of the model's input tensor
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum InputDtype {
    #[default]
    Float32,
    Int64,
}

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub inference: InferenceConfig,
    #[serde(default)]
    pub tokenizer: TokenizerSettings,
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Model / endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct InferenceConfig {
    /// "local" (graph model) or "remote" (HTTP endpoint)
    #[serde(default)]
    pub strategy: InferenceStrategy,
    /// Path to the exported ONNX graph
    #[serde(default = "default_model_path")]
    pub model_path: String,
    /// Input tensor name; discovered from the model signature when unset
    #[serde(default)]
    pub input_name: Option<String>,
    /// Output tensor name; discovered from the model signature when unset
    #[serde(default)]
    pub output_name: Option<String>,
    #[serde(default)]
    pub input_dtype: InputDtype,
    /// Number of intra-op threads for ONNX inference (default: 1)
    #[serde(default = "default_onnx_threads")]
    pub onnx_threads: usize,
    /// Prediction endpoint for the remote strategy
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Request timeout for the remote strategy
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_model_path() -> String {
    "models/job_fraud.onnx".to_string()
}

fn default_onnx_threads() -> usize {
    1
}

fn default_endpoint() -> String {
    "http://localhost:8000/predict".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            strategy: InferenceStrategy::Local,
            model_path: default_model_path(),
            input_name: None,
            output_name: None,
            input_dtype: InputDtype::Float32,
            onnx_threads: default_onnx_threads(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Tokenizer configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TokenizerSettings {
    /// Path or URL of the `{max_len, word_index}` document
    #[serde(default = "default_tokenizer_path")]
    pub path: String,
    /// Overrides `max_len` from the tokenizer document
    #[serde(default)]
    pub sequence_length: Option<usize>,
}

fn default_tokenizer_path() -> String {
    "models/tokenizer_config.json".to_string()
}

impl Default for TokenizerSettings {
    fn default() -> Self {
        Self {
            path: default_tokenizer_path(),
            sequence_length: None,
        }
    }
}

/// Dataset sources for the EDA summary, tried in order
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    /// Precomputed summary JSON (path or URL)
    #[serde(default)]
    pub precomputed: Option<String>,
    /// ZIP archive holding a single CSV (path or URL)
    #[serde(default)]
    pub archive: Option<String>,
    /// Size of the per-class word frequency tables, capped at 100
    #[serde(default = "default_top_words")]
    pub top_words: usize,
}

fn default_top_words() -> usize {
    100
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            precomputed: Some("data/eda_summary.json".to_string()),
            archive: Some("data/fake_job_postings.zip".to_string()),
            top_words: default_top_words(),
        }
    }
}

/// Detection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DetectionConfig {
    /// Probability at or above which a posting is labelled suspicious
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_threshold() -> f64 {
    0.5
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_level")]
    pub level: String,
    /// Log format (json, pretty)
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Load configuration from a specific path, with `FAKEJOB_` environment overrides
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("FAKEJOB")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Sequence length requested by configuration, if any
    pub fn sequence_length_override(&self) -> Option<usize> {
        self.tokenizer.sequence_length.filter(|&len| len > 0)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            inference: InferenceConfig::default(),
            tokenizer: TokenizerSettings::default(),
            dataset: DatasetConfig::default(),
            detection: DetectionConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.inference.strategy, InferenceStrategy::Local);
        assert_eq!(config.inference.endpoint, "http://localhost:8000/predict");
        assert_eq!(config.detection.threshold, 0.5);
        assert_eq!(config.dataset.top_words, 100);
        assert!(config.sequence_length_override().is_none());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[inference]
strategy = "remote"
endpoint = "http://10.0.0.5:9000/predict"

[tokenizer]
path = "tok.json"
sequence_length = 300
"#
        )
        .unwrap();

        let config = AppConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config.inference.strategy, InferenceStrategy::Remote);
        assert_eq!(config.inference.endpoint, "http://10.0.0.5:9000/predict");
        assert_eq!(config.inference.input_dtype, InputDtype::Float32);
        assert_eq!(config.sequence_length_override(), Some(300));
        assert_eq!(config.detection.threshold, 0.5);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_zero_sequence_length_is_ignored() {
        let mut config = AppConfig::default();
        config.tokenizer.sequence_length = Some(0);
        assert!(config.sequence_length_override().is_none());
    }
}
