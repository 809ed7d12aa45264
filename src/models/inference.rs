//! Fraud probability predictors
//!
//! Two interchangeable backends sit behind [`Predictor`]: the exported graph
//! executed in-process, and a remote HTTP endpoint (see [`super::remote`]).

use crate::config::InputDtype;
use crate::models::loader::GraphModel;
use crate::tokenizer::Tokenizer;
use crate::types::posting::PostingForm;
use anyhow::{Context, Result};
use ort::value::Tensor;
use std::sync::Mutex;
use tracing::debug;

/// Produces P(fraudulent) for a submitted posting.
pub trait Predictor: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// Probability in [0, 1] that the posting is fraudulent
    fn predict(&self, form: &PostingForm) -> Result<f64>;
}

/// Reject non-finite scores and clamp the rest into [0, 1].
pub fn sanitize_probability(raw: f64) -> Result<f64> {
    anyhow::ensure!(raw.is_finite(), "model returned non-finite probability {}", raw);
    Ok(raw.clamp(0.0, 1.0))
}

/// Runs the exported graph on tokenized form text
pub struct LocalGraphPredictor {
    /// `Session::run` needs exclusive access
    model: Mutex<GraphModel>,
    tokenizer: Tokenizer,
    input_dtype: InputDtype,
}

impl LocalGraphPredictor {
    pub fn new(model: GraphModel, tokenizer: Tokenizer, input_dtype: InputDtype) -> Self {
        Self {
            model: Mutex::new(model),
            tokenizer,
            input_dtype,
        }
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Run the graph on one encoded sequence, fed as a `[1, len]` tensor.
    ///
    /// The input tensor and session outputs are released before returning,
    /// on success and on error.
    pub fn predict_sequence(&self, sequence: &[i64]) -> Result<f64> {
        let mut model = self
            .model
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;
        let GraphModel {
            session,
            input_name,
            output_name,
        } = &mut *model;

        let shape = vec![1_i64, sequence.len() as i64];
        let input = match self.input_dtype {
            InputDtype::Float32 => {
                let values: Vec<f32> = sequence.iter().map(|&id| id as f32).collect();
                Tensor::from_array((shape, values))
                    .context("Failed to create input tensor")?
                    .into_dyn()
            }
            InputDtype::Int64 => Tensor::from_array((shape, sequence.to_vec()))
                .context("Failed to create input tensor")?
                .into_dyn(),
        };

        let outputs = session
            .run(ort::inputs![input_name.as_str() => input])
            .context("Graph execution failed")?;
        let output = outputs
            .get(output_name.as_str())
            .with_context(|| format!("model produced no {:?} output", output_name))?;
        let (_, data) = output
            .try_extract_tensor::<f32>()
            .context("output tensor is not float32")?;
        let raw = data
            .first()
            .copied()
            .context("output tensor is empty")?;

        sanitize_probability(raw as f64)
    }
}

impl Predictor for LocalGraphPredictor {
    fn name(&self) -> &'static str {
        "local-graph"
    }

    fn predict(&self, form: &PostingForm) -> Result<f64> {
        let sequence = self.tokenizer.encode(&form.full_text());
        debug!(
            tokens = sequence.iter().filter(|&&id| id != 0).count(),
            sequence_length = sequence.len(),
            "Encoded posting"
        );
        self.predict_sequence(&sequence)
    }
}
