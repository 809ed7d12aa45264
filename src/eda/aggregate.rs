//! Dataset statistics aggregation

use crate::eda::summary::{ClassDistribution, EdaSummary, MissingValues, TextLength, TOP_WORDS};
use crate::tokenizer::words;
use crate::types::posting::{JobPosting, TextField};
use std::collections::HashMap;

/// Word counts that remember first-seen order for tie breaking
#[derive(Debug, Default)]
struct WordCounter {
    positions: HashMap<String, usize>,
    counts: Vec<(String, u64)>,
}

impl WordCounter {
    fn add(&mut self, word: String) {
        match self.positions.get(&word) {
            Some(&pos) => self.counts[pos].1 += 1,
            None => {
                self.positions.insert(word.clone(), self.counts.len());
                self.counts.push((word, 1));
            }
        }
    }

    /// Most frequent first; stable, so equal counts keep first-seen order
    fn top(mut self, limit: usize) -> Vec<(String, u64)> {
        self.counts.sort_by(|a, b| b.1.cmp(&a.1));
        self.counts.truncate(limit);
        self.counts
    }
}

/// Incrementally builds an [`EdaSummary`] from dataset rows.
#[derive(Debug)]
pub struct SummaryBuilder {
    top_words: usize,
    classes: ClassDistribution,
    text_lengths: Vec<TextLength>,
    missing: MissingValues,
    real_words: WordCounter,
    fake_words: WordCounter,
}

impl SummaryBuilder {
    /// Word tables keep at most `top_words` entries, capped at [`TOP_WORDS`].
    pub fn new(top_words: usize) -> Self {
        Self {
            top_words: top_words.min(TOP_WORDS),
            classes: ClassDistribution::default(),
            text_lengths: Vec::new(),
            missing: MissingValues::default(),
            real_words: WordCounter::default(),
            fake_words: WordCounter::default(),
        }
    }

    pub fn add(&mut self, row: &JobPosting) {
        let is_fake = row.is_fake();

        if is_fake {
            self.classes.fake += 1;
        } else {
            self.classes.real += 1;
        }
        self.classes.total += 1;

        let length = row.joined(&TextField::ALL).chars().count();
        self.text_lengths.push(TextLength { length, is_fake });

        for field in TextField::ALL {
            if row.is_missing(field) {
                self.missing.increment(field, is_fake);
            }
        }

        let counter = if is_fake {
            &mut self.fake_words
        } else {
            &mut self.real_words
        };
        for word in words(&row.joined(&TextField::VOCABULARY)) {
            counter.add(word);
        }
    }

    pub fn rows(&self) -> u64 {
        self.classes.total
    }

    pub fn finish(self) -> EdaSummary {
        EdaSummary {
            class_distribution: self.classes,
            text_lengths: self.text_lengths,
            missing_values: self.missing,
            real_words: self.real_words.top(self.top_words),
            fake_words: self.fake_words.top(self.top_words),
        }
    }
}

impl Default for SummaryBuilder {
    fn default() -> Self {
        Self::new(TOP_WORDS)
    }
}

/// Summarize `rows` with the default 100-entry word tables.
pub fn aggregate(rows: &[JobPosting]) -> EdaSummary {
    let mut builder = SummaryBuilder::default();
    rows.iter().for_each(|row| builder.add(row));
    builder.finish()
}
