//! Application context: startup loading and the submission handler

use crate::config::{AppConfig, InferenceConfig, InferenceStrategy};
use crate::eda::source::{load_summary, DatasetOrigin, LoadedDataset};
use crate::eda::summary::EdaSummary;
use crate::error::{Component, DetectorError};
use crate::metrics::SessionMetrics;
use crate::models::inference::{LocalGraphPredictor, Predictor};
use crate::models::loader::{GraphModel, ModelLoader};
use crate::models::remote::RemotePredictor;
use crate::tokenizer::{Tokenizer, TokenizerConfig};
use crate::types::posting::PostingForm;
use crate::types::verdict::Verdict;
use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Enabled/disabled state of the submit control
#[derive(Debug)]
pub struct SubmitControl {
    enabled: AtomicBool,
}

impl SubmitControl {
    pub fn new() -> Self {
        Self {
            enabled: AtomicBool::new(true),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Disable the control until the returned guard drops; `None` if already disabled.
    pub fn try_disable(&self) -> Option<SubmitGuard<'_>> {
        self.enabled
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SubmitGuard { control: self })
    }
}

impl Default for SubmitControl {
    fn default() -> Self {
        Self::new()
    }
}

/// Re-enables the submit control when dropped
pub struct SubmitGuard<'a> {
    control: &'a SubmitControl,
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.control.enabled.store(true, Ordering::Release);
    }
}

enum Backend {
    Local(GraphModel),
    Remote(RemotePredictor),
}

fn load_backend(config: &InferenceConfig) -> Result<Backend> {
    match config.strategy {
        InferenceStrategy::Local => ModelLoader::load_from_config(config).map(Backend::Local),
        InferenceStrategy::Remote => RemotePredictor::from_config(config).map(Backend::Remote),
    }
}

fn joined<T>(handle: thread::ScopedJoinHandle<'_, Result<T>>) -> Result<T> {
    handle
        .join()
        .unwrap_or_else(|_| Err(anyhow::anyhow!("loader thread panicked")))
}

/// Everything a session needs, built once at startup
pub struct AppContext {
    predictor: Box<dyn Predictor>,
    dataset: LoadedDataset,
    threshold: f64,
    submit: SubmitControl,
    metrics: SessionMetrics,
}

impl AppContext {
    pub fn new(predictor: Box<dyn Predictor>, dataset: LoadedDataset, threshold: f64) -> Self {
        Self {
            predictor,
            dataset,
            threshold,
            submit: SubmitControl::new(),
            metrics: SessionMetrics::new(),
        }
    }

    /// Load the model, tokenizer config and dataset concurrently.
    ///
    /// Any load failure fails the whole startup. The dataset itself never
    /// fails: it falls back to the synthetic summary.
    pub fn bootstrap(config: &AppConfig) -> Result<Self, DetectorError> {
        let started = Instant::now();
        let strategy = config.inference.strategy;

        let (backend, tokenizer, dataset) = thread::scope(|s| {
            let backend = s.spawn(|| load_backend(&config.inference));
            let tokenizer = s.spawn(|| match strategy {
                InferenceStrategy::Local => TokenizerConfig::load(&config.tokenizer.path).map(Some),
                InferenceStrategy::Remote => Ok(None),
            });
            let dataset = s.spawn(|| Ok(load_summary(&config.dataset)));
            (joined(backend), joined(tokenizer), joined(dataset))
        });

        let backend = backend.map_err(|e| Self::startup_failure(Component::Model, e))?;
        let tokenizer = tokenizer.map_err(|e| Self::startup_failure(Component::Tokenizer, e))?;
        let dataset = dataset.map_err(|e| Self::startup_failure(Component::Dataset, e))?;

        let predictor: Box<dyn Predictor> = match (backend, tokenizer) {
            (Backend::Local(model), Some(tokenizer)) => {
                let tokenizer = Tokenizer::new(tokenizer, config.sequence_length_override());
                info!(sequence_length = tokenizer.sequence_length(), "Tokenizer ready");
                Box::new(LocalGraphPredictor::new(
                    model,
                    tokenizer,
                    config.inference.input_dtype,
                ))
            }
            (Backend::Local(_), None) => {
                return Err(Self::startup_failure(
                    Component::Tokenizer,
                    anyhow::anyhow!("local inference requires a tokenizer config"),
                ))
            }
            (Backend::Remote(remote), _) => {
                info!(endpoint = %remote.endpoint(), "Using remote prediction endpoint");
                Box::new(remote)
            }
        };

        if dataset.origin == DatasetOrigin::Synthetic {
            warn!("Charts will show synthetic data");
        }
        info!(
            predictor = predictor.name(),
            dataset = %dataset.origin,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Startup complete"
        );

        Ok(Self::new(predictor, dataset, config.detection.threshold))
    }

    fn startup_failure(component: Component, source: anyhow::Error) -> DetectorError {
        error!(component = %component, error = %format!("{:#}", source), "Startup failed");
        DetectorError::load(component, source)
    }

    /// Classify one submitted form.
    ///
    /// A blank form is rejected before any inference and leaves the control
    /// enabled. Otherwise the control is disabled for the duration of the call
    /// and re-enabled on every outcome.
    pub fn submit(&self, form: &PostingForm) -> Result<Verdict, DetectorError> {
        if form.is_blank() {
            self.metrics.record_empty_submission();
            return Err(DetectorError::EmptyInput);
        }

        let _guard = self.submit.try_disable().ok_or(DetectorError::Busy)?;
        let started = Instant::now();

        match self.predictor.predict(form) {
            Ok(probability) => {
                let verdict = Verdict::new(probability, self.threshold);
                let latency = started.elapsed();
                self.metrics.record_prediction(latency, &verdict);
                debug!(
                    predictor = self.predictor.name(),
                    probability = verdict.probability,
                    label = %verdict.label,
                    latency_us = latency.as_micros() as u64,
                    "Prediction complete"
                );
                Ok(verdict)
            }
            Err(e) => {
                self.metrics.record_failure();
                error!(
                    predictor = self.predictor.name(),
                    error = %format!("{:#}", e),
                    "Prediction failed"
                );
                Err(DetectorError::Inference(e))
            }
        }
    }

    pub fn submit_enabled(&self) -> bool {
        self.submit.is_enabled()
    }

    pub fn summary(&self) -> &EdaSummary {
        &self.dataset.summary
    }

    pub fn dataset_origin(&self) -> DatasetOrigin {
        self.dataset.origin
    }

    pub fn predictor_name(&self) -> &'static str {
        self.predictor.name()
    }

    pub fn metrics(&self) -> &SessionMetrics {
        &self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatasetConfig;
    use crate::eda::synthetic::synthetic_summary;
    use crate::types::verdict::Label;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    struct Fixed {
        probability: f64,
        calls: Arc<AtomicUsize>,
    }

    impl Predictor for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn predict(&self, _form: &PostingForm) -> Result<f64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.probability)
        }
    }

    struct Failing;

    impl Predictor for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn predict(&self, _form: &PostingForm) -> Result<f64> {
            anyhow::bail!("connection refused")
        }
    }

    fn dataset() -> LoadedDataset {
        LoadedDataset {
            summary: synthetic_summary(),
            origin: DatasetOrigin::Synthetic,
        }
    }

    fn filled_form() -> PostingForm {
        PostingForm {
            title: "Urgent hiring".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_blank_form_skips_inference() {
        let calls = Arc::new(AtomicUsize::new(0));
        let ctx = AppContext::new(
            Box::new(Fixed {
                probability: 0.9,
                calls: calls.clone(),
            }),
            dataset(),
            0.5,
        );

        let blank = PostingForm {
            description: "   ".to_string(),
            ..Default::default()
        };
        assert!(matches!(ctx.submit(&blank), Err(DetectorError::EmptyInput)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(ctx.submit_enabled());
        assert_eq!(ctx.metrics().empty_submissions.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_successful_submission() {
        let calls = Arc::new(AtomicUsize::new(0));
        let ctx = AppContext::new(
            Box::new(Fixed {
                probability: 0.73,
                calls: calls.clone(),
            }),
            dataset(),
            0.5,
        );

        let verdict = ctx.submit(&filled_form()).unwrap();
        assert_eq!(verdict.label, Label::Suspicious);
        assert_eq!(verdict.probability_text(), "73.0% fake probability");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(ctx.submit_enabled());
    }

    #[test]
    fn test_failure_re_enables_control() {
        let ctx = AppContext::new(Box::new(Failing), dataset(), 0.5);

        let err = ctx.submit(&filled_form()).unwrap_err();
        assert!(matches!(err, DetectorError::Inference(_)));
        assert!(err.is_recoverable());
        assert!(ctx.submit_enabled());

        // The next submission is still accepted
        assert!(matches!(ctx.submit(&filled_form()), Err(DetectorError::Inference(_))));
        assert_eq!(ctx.metrics().failures.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_submit_control_is_exclusive() {
        let control = SubmitControl::new();
        let guard = control.try_disable().unwrap();
        assert!(!control.is_enabled());
        assert!(control.try_disable().is_none());
        drop(guard);
        assert!(control.is_enabled());
    }

    #[test]
    fn test_bootstrap_remote_without_dataset() {
        let mut config = AppConfig::default();
        config.inference.strategy = InferenceStrategy::Remote;
        config.inference.endpoint = "http://127.0.0.1:9/predict".to_string();
        config.tokenizer.path = "/does/not/exist.json".to_string();
        config.dataset = DatasetConfig {
            precomputed: None,
            archive: None,
            top_words: 100,
        };

        let ctx = AppContext::bootstrap(&config).unwrap();
        assert_eq!(ctx.predictor_name(), "remote-http");
        assert_eq!(ctx.dataset_origin(), DatasetOrigin::Synthetic);
        assert!(ctx.submit_enabled());
    }

    #[test]
    fn test_bootstrap_fails_on_bad_endpoint() {
        let mut config = AppConfig::default();
        config.inference.strategy = InferenceStrategy::Remote;
        config.inference.endpoint = " ".to_string();

        match AppContext::bootstrap(&config) {
            Err(DetectorError::Load { component, .. }) => assert_eq!(component, Component::Model),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("bootstrap should fail"),
        }
    }
}
