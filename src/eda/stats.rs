//! Five-number summary for box plots

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FiveNumberSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Nearest-rank quartiles: the value at sorted index `floor(n * p)`.
///
/// Returns `None` for an empty input. NaNs sort last.
pub fn five_number_summary(values: &[f64]) -> Option<FiveNumberSummary> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    let at = |p: f64| sorted[((n as f64 * p).floor() as usize).min(n - 1)];

    Some(FiveNumberSummary {
        min: sorted[0],
        q1: at(0.25),
        median: at(0.5),
        q3: at(0.75),
        max: sorted[n - 1],
    })
}
