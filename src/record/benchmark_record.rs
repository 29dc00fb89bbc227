//! Benchmark Record - one timed run of a kernel at a given matrix size

use serde::{Deserialize, Serialize};

/// Where a record's `average_time` came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AverageSource {
    /// The source table supplied the value; it is kept as-is.
    Reported,
    /// The value was computed from `individual_times`.
    Derived,
}

/// A row as read from a source table, before any statistics are derived.
///
/// `average_time` is optional: source tables may omit the column or leave the
/// cell empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    language: String,
    matrix_size: u32,
    iterations: u32,
    individual_times: Vec<f64>,
    average_time: Option<f64>,
}

impl RawRecord {
    /// Create a raw record. `iterations` is taken from the number of samples.
    #[must_use]
    pub fn new(language: impl Into<String>, matrix_size: u32, individual_times: Vec<f64>) -> Self {
        Self::builder(language, matrix_size)
            .individual_times(individual_times)
            .build()
    }

    /// Create a builder for constructing a raw record with optional fields.
    #[must_use]
    pub fn builder(language: impl Into<String>, matrix_size: u32) -> RawRecordBuilder {
        RawRecordBuilder::new(language, matrix_size)
    }

    /// Get the language identifier.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Get the square matrix dimension.
    #[must_use]
    pub const fn matrix_size(&self) -> u32 {
        self.matrix_size
    }

    /// Get the number of timed iterations.
    #[must_use]
    pub const fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Get the per-iteration timings in seconds.
    #[must_use]
    pub fn individual_times(&self) -> &[f64] {
        &self.individual_times
    }

    /// Get the average time reported by the source, if any.
    #[must_use]
    pub const fn average_time(&self) -> Option<f64> {
        self.average_time
    }

    pub(crate) fn into_parts(self) -> (String, u32, u32, Vec<f64>, Option<f64>) {
        (
            self.language,
            self.matrix_size,
            self.iterations,
            self.individual_times,
            self.average_time,
        )
    }
}

/// Builder for `RawRecord`.
#[derive(Debug)]
pub struct RawRecordBuilder {
    language: String,
    matrix_size: u32,
    iterations: Option<u32>,
    individual_times: Vec<f64>,
    average_time: Option<f64>,
}

impl RawRecordBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(language: impl Into<String>, matrix_size: u32) -> Self {
        Self {
            language: language.into(),
            matrix_size,
            iterations: None,
            individual_times: Vec::new(),
            average_time: None,
        }
    }

    /// Set the per-iteration timings.
    #[must_use]
    pub fn individual_times(mut self, times: Vec<f64>) -> Self {
        self.individual_times = times;
        self
    }

    /// Override the iteration count (defaults to the number of timings).
    #[must_use]
    pub const fn iterations(mut self, iterations: u32) -> Self {
        self.iterations = Some(iterations);
        self
    }

    /// Set an explicitly reported average time.
    #[must_use]
    pub const fn average_time(mut self, average_time: f64) -> Self {
        self.average_time = Some(average_time);
        self
    }

    /// Build the `RawRecord`.
    #[must_use]
    pub fn build(self) -> RawRecord {
        let iterations = self
            .iterations
            .unwrap_or_else(|| u32::try_from(self.individual_times.len()).unwrap_or(u32::MAX));
        RawRecord {
            language: self.language,
            matrix_size: self.matrix_size,
            iterations,
            individual_times: self.individual_times,
            average_time: self.average_time,
        }
    }
}

/// A benchmark record with derived statistics.
///
/// Created by [`crate::metrics::derive`]. `fastest_time` and
/// `relative_performance` stay `None` until the aggregator has seen every
/// record at the same matrix size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    language: String,
    matrix_size: u32,
    iterations: u32,
    individual_times: Vec<f64>,
    average_time: f64,
    average_source: AverageSource,
    min_time: f64,
    max_time: f64,
    std_dev: f64,
    fastest_time: Option<f64>,
    relative_performance: Option<f64>,
}

impl BenchmarkRecord {
    #[allow(clippy::too_many_arguments)]
    pub(crate) const fn from_parts(
        language: String,
        matrix_size: u32,
        iterations: u32,
        individual_times: Vec<f64>,
        average_time: f64,
        average_source: AverageSource,
        min_time: f64,
        max_time: f64,
        std_dev: f64,
    ) -> Self {
        Self {
            language,
            matrix_size,
            iterations,
            individual_times,
            average_time,
            average_source,
            min_time,
            max_time,
            std_dev,
            fastest_time: None,
            relative_performance: None,
        }
    }

    /// Get the language identifier.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Get the square matrix dimension.
    #[must_use]
    pub const fn matrix_size(&self) -> u32 {
        self.matrix_size
    }

    /// Get the number of timed iterations.
    #[must_use]
    pub const fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Get the per-iteration timings in seconds.
    #[must_use]
    pub fn individual_times(&self) -> &[f64] {
        &self.individual_times
    }

    /// Get the average time in seconds.
    #[must_use]
    pub const fn average_time(&self) -> f64 {
        self.average_time
    }

    /// Whether `average_time` was reported by the source or derived.
    #[must_use]
    pub const fn average_source(&self) -> AverageSource {
        self.average_source
    }

    /// Get the fastest iteration.
    #[must_use]
    pub const fn min_time(&self) -> f64 {
        self.min_time
    }

    /// Get the slowest iteration.
    #[must_use]
    pub const fn max_time(&self) -> f64 {
        self.max_time
    }

    /// Get the population standard deviation of the iterations.
    #[must_use]
    pub const fn std_dev(&self) -> f64 {
        self.std_dev
    }

    /// Get the fastest average time among all records at this matrix size.
    #[must_use]
    pub const fn fastest_time(&self) -> Option<f64> {
        self.fastest_time
    }

    /// Get `average_time / fastest_time`.
    #[must_use]
    pub const fn relative_performance(&self) -> Option<f64> {
        self.relative_performance
    }

    /// Record the fastest average at this record's size and derive the ratio.
    pub(crate) fn annotate_fastest(&mut self, fastest_time: f64) {
        self.fastest_time = Some(fastest_time);
        self.relative_performance = Some(if self.average_time == fastest_time {
            1.0
        } else {
            self.average_time / fastest_time
        });
    }
}
