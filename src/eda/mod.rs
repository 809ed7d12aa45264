//! Exploratory statistics over the job postings dataset

pub mod aggregate;
pub mod source;
pub mod stats;
pub mod summary;
pub mod synthetic;

pub use aggregate::{aggregate, SummaryBuilder};
pub use source::{load_summary, DatasetOrigin, LoadedDataset};
pub use stats::{five_number_summary, FiveNumberSummary};
pub use summary::{EdaSummary, LengthBoxPlots, TOP_WORDS};
pub use synthetic::synthetic_summary;
