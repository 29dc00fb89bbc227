//! Per-record timing statistics
//!
//! Pure functions: a [`RawRecord`] goes in, a [`BenchmarkRecord`] with
//! `min_time`, `max_time`, `std_dev` and a resolved `average_time` comes out.
//!
//! An explicitly reported average takes precedence over the derived mean and
//! is never corrected, even when it disagrees with the raw samples.

use crate::record::{AverageSource, BenchmarkRecord, RawRecord};
use tracing::debug;

/// Relative disagreement above which a reported average is noted in debug logs.
const AVERAGE_MISMATCH_TOLERANCE: f64 = 1e-3;

/// Summary statistics over one timing sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingStats {
    /// Arithmetic mean
    pub mean: f64,
    /// Smallest sample
    pub min: f64,
    /// Largest sample
    pub max: f64,
    /// Population standard deviation (divides by `n`)
    pub std_dev: f64,
}

impl TimingStats {
    /// Compute statistics over the full sequence.
    ///
    /// Returns `None` for an empty sequence.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        let mean = mean(samples)?;
        let n = samples.len() as f64;
        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let variance = samples.iter().map(|t| (t - mean).powi(2)).sum::<f64>() / n;

        Some(Self {
            mean,
            min,
            max,
            std_dev: variance.sqrt(),
        })
    }
}

/// Arithmetic mean of a sequence, `None` when empty.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Derive the statistics of one record.
///
/// An empty timing sequence yields zero extrema and deviation; the ingestor
/// never produces one.
#[must_use]
pub fn derive(raw: RawRecord) -> BenchmarkRecord {
    let (language, matrix_size, iterations, individual_times, reported) = raw.into_parts();
    let stats = TimingStats::from_samples(&individual_times).unwrap_or(TimingStats {
        mean: 0.0,
        min: 0.0,
        max: 0.0,
        std_dev: 0.0,
    });

    let (average_time, average_source) = match reported {
        Some(average) => {
            let mismatch = (average - stats.mean).abs() / stats.mean;
            if stats.mean > 0.0 && mismatch > AVERAGE_MISMATCH_TOLERANCE {
                debug!(
                    language = %language,
                    matrix_size,
                    reported = average,
                    derived = stats.mean,
                    "reported average disagrees with samples; keeping reported value"
                );
            }
            (average, AverageSource::Reported)
        }
        None => (stats.mean, AverageSource::Derived),
    };

    BenchmarkRecord::from_parts(
        language,
        matrix_size,
        iterations,
        individual_times,
        average_time,
        average_source,
        stats.min,
        stats.max,
        stats.std_dev,
    )
}
