//! Classification outcome for a single submission

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default decision threshold on P(fraudulent)
pub const DEFAULT_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Label {
    Suspicious,
    Legit,
}

impl Label {
    /// `Suspicious` when `probability >= threshold`
    pub fn from_probability(probability: f64, threshold: f64) -> Self {
        if probability >= threshold {
            Label::Suspicious
        } else {
            Label::Legit
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Suspicious => f.write_str("SUSPICIOUS"),
            Label::Legit => f.write_str("LEGIT"),
        }
    }
}

/// Probability that a posting is fraudulent, with its derived label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    /// P(fraudulent), in [0, 1]
    pub probability: f64,
    pub label: Label,
    pub timestamp: DateTime<Utc>,
}

impl Verdict {
    pub fn new(probability: f64, threshold: f64) -> Self {
        let probability = probability.clamp(0.0, 1.0);
        Self {
            probability,
            label: Label::from_probability(probability, threshold),
            timestamp: Utc::now(),
        }
    }

    /// e.g. "73.0% fake probability"
    pub fn probability_text(&self) -> String {
        format!("{:.1}% fake probability", self.probability * 100.0)
    }

    /// Fill percentage for the result bar
    pub fn bar_width(&self) -> f64 {
        (self.probability * 100.0).clamp(0.0, 100.0)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.probability_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_from_probability() {
        assert_eq!(Label::from_probability(0.5, DEFAULT_THRESHOLD), Label::Suspicious);
        assert_eq!(Label::from_probability(0.4999, DEFAULT_THRESHOLD), Label::Legit);
        assert_eq!(Label::from_probability(1.0, DEFAULT_THRESHOLD), Label::Suspicious);
    }

    #[test]
    fn test_verdict_display_text() {
        let verdict = Verdict::new(0.73, DEFAULT_THRESHOLD);
        assert_eq!(verdict.label, Label::Suspicious);
        assert_eq!(verdict.label.to_string(), "SUSPICIOUS");
        assert_eq!(verdict.probability_text(), "73.0% fake probability");
        assert_eq!(verdict.to_string(), "SUSPICIOUS (73.0% fake probability)");
    }

    #[test]
    fn test_verdict_clamps() {
        let verdict = Verdict::new(1.7, DEFAULT_THRESHOLD);
        assert_eq!(verdict.probability, 1.0);
        assert_eq!(verdict.bar_width(), 100.0);

        let verdict = Verdict::new(-0.2, DEFAULT_THRESHOLD);
        assert_eq!(verdict.label, Label::Legit);
        assert_eq!(verdict.probability_text(), "0.0% fake probability");
    }

    #[test]
    fn test_verdict_serialization() {
        let verdict = Verdict::new(0.12, DEFAULT_THRESHOLD);
        let json = serde_json::to_string(&verdict).unwrap();
        assert!(json.contains("\"label\":\"LEGIT\""));

        let deserialized: Verdict = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.label, Label::Legit);
        assert_eq!(deserialized.probability, verdict.probability);
    }
}
