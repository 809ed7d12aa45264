//! Chart-ready dataset summary

use crate::eda::stats::{five_number_summary, FiveNumberSummary};
use crate::types::posting::TextField;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default size of each word frequency table
pub const TOP_WORDS: usize = 100;

/// Summary statistics over the job postings dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdaSummary {
    pub class_distribution: ClassDistribution,
    pub text_lengths: Vec<TextLength>,
    pub missing_values: MissingValues,
    /// `(word, frequency)` for real postings, most frequent first
    pub real_words: Vec<(String, u64)>,
    /// `(word, frequency)` for fake postings, most frequent first
    pub fake_words: Vec<(String, u64)>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDistribution {
    pub real: u64,
    pub fake: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextLength {
    pub length: usize,
    pub is_fake: bool,
}

/// Per-class count of rows with an absent or blank field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingValues {
    pub real: BTreeMap<String, u64>,
    pub fake: BTreeMap<String, u64>,
}

impl Default for MissingValues {
    fn default() -> Self {
        let zeroed: BTreeMap<String, u64> = TextField::ALL
            .iter()
            .map(|field| (field.as_str().to_string(), 0))
            .collect();
        Self {
            real: zeroed.clone(),
            fake: zeroed,
        }
    }
}

impl MissingValues {
    pub fn increment(&mut self, field: TextField, is_fake: bool) {
        let counts = if is_fake { &mut self.fake } else { &mut self.real };
        *counts.entry(field.as_str().to_string()).or_insert(0) += 1;
    }

    pub fn get(&self, field: TextField, is_fake: bool) -> u64 {
        let counts = if is_fake { &self.fake } else { &self.real };
        counts.get(field.as_str()).copied().unwrap_or(0)
    }
}

/// Text length distribution per class
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LengthBoxPlots {
    pub real: Option<FiveNumberSummary>,
    pub fake: Option<FiveNumberSummary>,
}

impl EdaSummary {
    /// Check the invariants a loaded summary must satisfy.
    pub fn validate(&self, max_words: usize) -> Result<()> {
        let classes = &self.class_distribution;
        let max_words = max_words.min(TOP_WORDS);
        anyhow::ensure!(
            classes.real.checked_add(classes.fake) == Some(classes.total),
            "class total {} != real {} + fake {}",
            classes.total,
            classes.real,
            classes.fake
        );
        for (name, words) in [("real", &self.real_words), ("fake", &self.fake_words)] {
            anyhow::ensure!(
                words.len() <= max_words,
                "{} word table has {} entries (max {})",
                name,
                words.len(),
                max_words
            );
            anyhow::ensure!(
                words.windows(2).all(|pair| pair[0].1 >= pair[1].1),
                "{} word table is not sorted by frequency",
                name
            );
        }
        Ok(())
    }

    /// Five-number summaries of text length for each class
    pub fn length_box_plots(&self) -> LengthBoxPlots {
        let lengths = |fake: bool| -> Vec<f64> {
            self.text_lengths
                .iter()
                .filter(|entry| entry.is_fake == fake)
                .map(|entry| entry.length as f64)
                .collect()
        };
        LengthBoxPlots {
            real: five_number_summary(&lengths(false)),
            fake: five_number_summary(&lengths(true)),
        }
    }

    /// Fake share of all postings, in percent
    pub fn fake_rate(&self) -> f64 {
        let classes = &self.class_distribution;
        if classes.total == 0 {
            0.0
        } else {
            classes.fake as f64 / classes.total as f64 * 100.0
        }
    }
}
