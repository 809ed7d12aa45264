//! Fake Job Posting Detector
//!
//! Classifies job postings as fraudulent or legitimate with a pre-trained
//! text model, executed in-process (ONNX) or behind an HTTP endpoint, and
//! computes exploratory statistics over the job postings dataset.

pub mod app;
pub mod config;
pub mod eda;
pub mod error;
pub mod fetch;
pub mod metrics;
pub mod models;
pub mod tokenizer;
pub mod types;

pub use app::AppContext;
pub use config::AppConfig;
pub use eda::{aggregate, five_number_summary, EdaSummary};
pub use error::DetectorError;
pub use models::{LocalGraphPredictor, Predictor, RemotePredictor};
pub use tokenizer::{encode, Tokenizer, TokenizerConfig};
pub use types::{JobPosting, Label, PostingForm, Verdict};
