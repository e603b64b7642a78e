//! Latency statistics over benchmark iterations.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Summary of per-iteration wall-clock times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub iterations: usize,
    pub mean_ms: f64,
    pub std_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub p50_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    /// Vector elements added per second, averaged over all iterations.
    pub elements_per_second: f64,
}

impl Statistics {
    /// Compute statistics for iterations that each processed `elements`
    /// items. Returns `None` when `durations` is empty.
    pub fn from_durations(durations: &[Duration], elements: usize) -> Option<Self> {
        if durations.is_empty() {
            return None;
        }

        let mut latencies: Vec<f64> = durations.iter().map(|d| d.as_secs_f64() * 1000.0).collect();
        let n = latencies.len() as f64;

        let mean = latencies.iter().sum::<f64>() / n;
        let variance = latencies.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / n;

        latencies.sort_by(f64::total_cmp);

        let total_secs: f64 = durations.iter().map(Duration::as_secs_f64).sum();
        let elements_per_second = if total_secs > 0.0 {
            (elements as f64 * n) / total_secs
        } else {
            0.0
        };

        Some(Self {
            iterations: latencies.len(),
            mean_ms: mean,
            std_ms: variance.sqrt(),
            min_ms: latencies[0],
            max_ms: latencies[latencies.len() - 1],
            p50_ms: percentile(&latencies, 50.0),
            p95_ms: percentile(&latencies, 95.0),
            p99_ms: percentile(&latencies, 99.0),
            elements_per_second,
        })
    }
}

/// Linear-interpolated percentile over ascending `sorted` data.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let index = (p / 100.0) * (sorted.len() - 1) as f64;
    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;

    if lower == upper {
        sorted[lower]
    } else {
        let weight = index - lower as f64;
        sorted[lower] * (1.0 - weight) + sorted[upper] * weight
    }
}
