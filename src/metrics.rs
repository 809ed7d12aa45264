//! Per-session prediction statistics.

use crate::types::verdict::{Label, Verdict};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::Duration;
use tracing::info;

/// Counters and latency samples for one session
pub struct SessionMetrics {
    /// Submissions that reached a predictor
    pub predictions: AtomicU64,
    /// Submissions rejected because every field was blank
    pub empty_submissions: AtomicU64,
    /// Predictions that failed
    pub failures: AtomicU64,
    suspicious: AtomicU64,
    legit: AtomicU64,
    /// Prediction latencies (in microseconds)
    latencies: RwLock<Vec<u64>>,
    /// Probability distribution buckets
    probability_buckets: RwLock<[u64; 10]>,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self {
            predictions: AtomicU64::new(0),
            empty_submissions: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            suspicious: AtomicU64::new(0),
            legit: AtomicU64::new(0),
            latencies: RwLock::new(Vec::new()),
            probability_buckets: RwLock::new([0; 10]),
        }
    }

    pub fn record_prediction(&self, latency: Duration, verdict: &Verdict) {
        self.predictions.fetch_add(1, Ordering::Relaxed);
        match verdict.label {
            Label::Suspicious => self.suspicious.fetch_add(1, Ordering::Relaxed),
            Label::Legit => self.legit.fetch_add(1, Ordering::Relaxed),
        };

        if let Ok(mut latencies) = self.latencies.write() {
            latencies.push(latency.as_micros() as u64);
            // Keep only the most recent samples
            if latencies.len() > 10000 {
                latencies.drain(0..5000);
            }
        }

        let bucket = (verdict.probability * 10.0).min(9.0) as usize;
        if let Ok(mut buckets) = self.probability_buckets.write() {
            buckets[bucket] += 1;
        }
    }

    pub fn record_failure(&self) {
        self.predictions.fetch_add(1, Ordering::Relaxed);
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_empty_submission(&self) {
        self.empty_submissions.fetch_add(1, Ordering::Relaxed);
    }

    /// (suspicious, legit) verdict counts
    pub fn verdict_split(&self) -> (u64, u64) {
        (
            self.suspicious.load(Ordering::Relaxed),
            self.legit.load(Ordering::Relaxed),
        )
    }

    pub fn latency_stats(&self) -> LatencyStats {
        let Ok(latencies) = self.latencies.read() else {
            return LatencyStats::default();
        };
        if latencies.is_empty() {
            return LatencyStats::default();
        }

        let mut sorted = latencies.clone();
        sorted.sort_unstable();
        let count = sorted.len();

        LatencyStats {
            count: count as u64,
            mean_us: sorted.iter().sum::<u64>() / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[((count as f64 * 0.95) as usize).min(count - 1)],
            max_us: sorted[count - 1],
        }
    }

    pub fn probability_distribution(&self) -> [u64; 10] {
        self.probability_buckets
            .read()
            .map(|buckets| *buckets)
            .unwrap_or([0; 10])
    }

    /// Log summary statistics
    pub fn print_summary(&self) {
        let predictions = self.predictions.load(Ordering::Relaxed);
        let failures = self.failures.load(Ordering::Relaxed);
        let empty = self.empty_submissions.load(Ordering::Relaxed);
        let (suspicious, legit) = self.verdict_split();
        let latency = self.latency_stats();

        info!(
            predictions,
            failures,
            empty_submissions = empty,
            suspicious,
            legit,
            "Session summary"
        );
        if latency.count > 0 {
            info!(
                mean_us = latency.mean_us,
                p50_us = latency.p50_us,
                p95_us = latency.p95_us,
                max_us = latency.max_us,
                "Prediction latency"
            );
        }

        let distribution = self.probability_distribution();
        let total: u64 = distribution.iter().sum();
        if total == 0 {
            return;
        }
        for (i, &count) in distribution.iter().enumerate() {
            let pct = count as f64 / total as f64 * 100.0;
            let bar = "█".repeat(((pct / 5.0) as usize).min(20));
            info!(
                "  {:.1}-{:.1}: {:>5} ({:>5.1}%) {}",
                i as f64 / 10.0,
                (i + 1) as f64 / 10.0,
                count,
                pct,
                bar
            );
        }
    }
}

impl Default for SessionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Prediction latency statistics
#[derive(Debug, Default, Clone, Copy)]
pub struct LatencyStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub max_us: u64,
}
