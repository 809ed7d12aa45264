//! Text to fixed-length id sequence, matching the preprocessing the model was trained with.
//!
//! Index `0` is padding and index `1` is the out-of-vocabulary id; every
//! configured word maps to a positive id.

use crate::fetch::fetch_bytes;
use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::info;

pub const PAD_ID: i64 = 0;
pub const OOV_ID: i64 = 1;

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z0-9_]+").expect("static word pattern"));

/// Lowercase `text` and split it into word tokens (ASCII alphanumeric/underscore runs).
pub fn words(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD.find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Vocabulary and sequence length exported alongside the model
#[derive(Debug, Clone)]
pub struct TokenizerConfig {
    max_len: usize,
    word_index: HashMap<String, i64>,
}

#[derive(Deserialize)]
struct RawTokenizerConfig {
    max_len: usize,
    word_index: HashMap<String, i64>,
}

impl TokenizerConfig {
    /// Build a config, rejecting a zero length or non-positive ids.
    pub fn new(max_len: usize, word_index: HashMap<String, i64>) -> Result<Self> {
        anyhow::ensure!(max_len > 0, "max_len must be positive");
        if let Some((word, id)) = word_index.iter().find(|(_, id)| **id <= PAD_ID) {
            anyhow::bail!("word_index maps {:?} to reserved id {}", word, id);
        }
        Ok(Self {
            max_len,
            word_index,
        })
    }

    /// Parse a `{max_len, word_index}` JSON document.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let raw: RawTokenizerConfig =
            serde_json::from_slice(bytes).context("malformed tokenizer config")?;
        Self::new(raw.max_len, raw.word_index)
    }

    /// Load the tokenizer document from a path or URL.
    pub fn load(location: &str) -> Result<Self> {
        let bytes = fetch_bytes(location)?;
        let config = Self::from_json(&bytes)?;
        info!(
            location = %location,
            max_len = config.max_len,
            vocabulary = config.word_index.len(),
            "Tokenizer config loaded"
        );
        Ok(config)
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn vocabulary_size(&self) -> usize {
        self.word_index.len()
    }

    /// Id for a single lowercase token
    pub fn id_of(&self, token: &str) -> i64 {
        self.word_index.get(token).copied().unwrap_or(OOV_ID)
    }
}

/// Encode `text` into exactly `fixed_len` ids.
///
/// Tokens beyond `fixed_len` are dropped; short sequences are right-padded with `0`.
/// Empty or punctuation-only text yields all zeros.
pub fn encode(text: &str, config: &TokenizerConfig, fixed_len: usize) -> Vec<i64> {
    let mut ids: Vec<i64> = words(text)
        .iter()
        .take(fixed_len)
        .map(|token| config.id_of(token))
        .collect();
    ids.resize(fixed_len, PAD_ID);
    ids
}

/// Tokenizer bound to the sequence length the model expects
#[derive(Debug, Clone)]
pub struct Tokenizer {
    config: TokenizerConfig,
    sequence_length: usize,
}

impl Tokenizer {
    /// Use `sequence_length` when given, else the config's `max_len`.
    pub fn new(config: TokenizerConfig, sequence_length: Option<usize>) -> Self {
        let sequence_length = sequence_length
            .filter(|&len| len > 0)
            .unwrap_or(config.max_len);
        Self {
            config,
            sequence_length,
        }
    }

    pub fn encode(&self, text: &str) -> Vec<i64> {
        encode(text, &self.config, self.sequence_length)
    }

    pub fn sequence_length(&self) -> usize {
        self.sequence_length
    }

    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }
}
