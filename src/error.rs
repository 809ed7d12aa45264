//! Error kinds surfaced to the caller of the detector

use std::fmt;
use thiserror::Error;

/// Startup resource that failed to load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Model,
    Tokenizer,
    Dataset,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Component::Model => "model",
            Component::Tokenizer => "tokenizer config",
            Component::Dataset => "dataset",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum DetectorError {
    /// Fatal for the session: the caller must restart with fixed resources.
    #[error("failed to load {component}")]
    Load {
        component: Component,
        #[source]
        source: anyhow::Error,
    },

    /// The submitted form had no usable text.
    #[error("please fill in at least one field of the job posting")]
    EmptyInput,

    /// A prediction is already in flight; the submit control is disabled.
    #[error("a prediction is already running")]
    Busy,

    /// Tokenization, graph execution or the remote call failed. Recoverable.
    #[error("prediction failed, please try again")]
    Inference(#[source] anyhow::Error),
}

impl DetectorError {
    pub fn load(component: Component, source: anyhow::Error) -> Self {
        DetectorError::Load { component, source }
    }

    /// Whether the session can continue after this error
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, DetectorError::Load { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_keeps_source() {
        let err = DetectorError::load(Component::Tokenizer, anyhow::anyhow!("missing max_len"));
        assert_eq!(err.to_string(), "failed to load tokenizer config");
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("missing max_len"));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_submission_errors_are_recoverable() {
        assert!(DetectorError::EmptyInput.is_recoverable());
        assert!(DetectorError::Busy.is_recoverable());
        assert!(DetectorError::Inference(anyhow::anyhow!("timeout")).is_recoverable());
    }
}
