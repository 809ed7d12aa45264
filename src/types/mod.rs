//! Type definitions for the fake job detector

pub mod posting;
pub mod verdict;

pub use posting::{JobPosting, PostingForm, TextField};
pub use verdict::{Label, Verdict};
