//! ONNX graph model loader

use crate::config::InferenceConfig;
use anyhow::{Context, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::Path;
use tracing::info;

/// Exported classifier graph with its resolved tensor names
pub struct GraphModel {
    /// ONNX Runtime session
    pub session: Session,
    /// Input tensor fed with the `[1, sequence_length]` id matrix
    pub input_name: String,
    /// Output tensor holding P(fraudulent)
    pub output_name: String,
}

/// Pick the tensor names to bind.
///
/// A configured name must be declared by the graph; without one, the first
/// declared input and output are used.
pub fn resolve_tensor_names(
    declared_inputs: &[String],
    declared_outputs: &[String],
    configured_input: Option<&str>,
    configured_output: Option<&str>,
) -> Result<(String, String)> {
    let pick = |declared: &[String], configured: Option<&str>, kind: &str| -> Result<String> {
        match configured {
            Some(name) => {
                anyhow::ensure!(
                    declared.iter().any(|d| d == name),
                    "{} tensor {:?} not declared by model (declared: {:?})",
                    kind,
                    name,
                    declared
                );
                Ok(name.to_string())
            }
            None => declared
                .first()
                .cloned()
                .with_context(|| format!("model declares no {} tensors", kind)),
        }
    };

    Ok((
        pick(declared_inputs, configured_input, "input")?,
        pick(declared_outputs, configured_output, "output")?,
    ))
}

/// Loader for the exported classifier graph
pub struct ModelLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Create a new model loader with specified number of threads
    pub fn with_threads(onnx_threads: usize) -> Result<Self> {
        // Initialize ONNX Runtime
        ort::init().commit()?;
        info!(onnx_threads = onnx_threads, "ONNX Runtime initialized");
        Ok(Self {
            onnx_threads: onnx_threads.max(1),
        })
    }

    /// Load the graph at `path`, binding the configured or declared tensor names
    pub fn load<P: AsRef<Path>>(
        &self,
        path: P,
        input_name: Option<&str>,
        output_name: Option<&str>,
    ) -> Result<GraphModel> {
        let path = path.as_ref();

        info!(path = %path.display(), threads = self.onnx_threads, "Loading ONNX model");

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(self.onnx_threads)?
            .commit_from_file(path)
            .with_context(|| format!("Failed to load model from {:?}", path))?;

        let declared_inputs: Vec<String> = session.inputs.iter().map(|i| i.name.clone()).collect();
        let declared_outputs: Vec<String> =
            session.outputs.iter().map(|o| o.name.clone()).collect();
        let (input_name, output_name) =
            resolve_tensor_names(&declared_inputs, &declared_outputs, input_name, output_name)?;

        info!(
            input = %input_name,
            output = %output_name,
            "Model loaded successfully"
        );

        Ok(GraphModel {
            session,
            input_name,
            output_name,
        })
    }

    /// Load using the `[inference]` section
    pub fn load_from_config(config: &InferenceConfig) -> Result<GraphModel> {
        Self::with_threads(config.onnx_threads)?.load(
            &config.model_path,
            config.input_name.as_deref(),
            config.output_name.as_deref(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_configured_names_win() {
        let (input, output) = resolve_tensor_names(
            &names(&["keras_tensor_11"]),
            &names(&["Identity:0", "Identity_1:0"]),
            Some("keras_tensor_11"),
            Some("Identity_1:0"),
        )
        .unwrap();
        assert_eq!(input, "keras_tensor_11");
        assert_eq!(output, "Identity_1:0");
    }

    #[test]
    fn test_falls_back_to_declared_signature() {
        let (input, output) =
            resolve_tensor_names(&names(&["input_ids"]), &names(&["dense_2"]), None, None).unwrap();
        assert_eq!(input, "input_ids");
        assert_eq!(output, "dense_2");
    }

    #[test]
    fn test_unknown_configured_name_is_rejected() {
        let err = resolve_tensor_names(
            &names(&["input_ids"]),
            &names(&["dense_2"]),
            Some("keras_tensor_11"),
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("keras_tensor_11"));
    }

    #[test]
    fn test_empty_signature_is_rejected() {
        assert!(resolve_tensor_names(&[], &names(&["out"]), None, None).is_err());
    }
}
