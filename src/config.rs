//! Analysis configuration
//!
//! ```rust
//! use matbench::config::AnalysisConfig;
//!
//! let config = AnalysisConfig::builder()
//!     .input_dir("results")
//!     .output_dir("analysis_results")
//!     .min_distinct_sizes(4)
//!     .build()?;
//! assert_eq!(config.min_distinct_sizes(), 4);
//! # Ok::<(), matbench::Error>(())
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Directory the language runners write their result tables to.
pub const DEFAULT_INPUT_DIR: &str = "results";

/// Directory analysis outputs are written to.
pub const DEFAULT_OUTPUT_DIR: &str = "analysis_results";

/// File name prefix of a source table (`benchmark_<language>_results.csv`).
pub const DEFAULT_SOURCE_PREFIX: &str = "benchmark_";

/// File name suffix of a source table.
pub const DEFAULT_SOURCE_SUFFIX: &str = "_results.csv";

/// Fewest distinct matrix sizes a language needs before it is classified.
pub const DEFAULT_MIN_DISTINCT_SIZES: usize = 3;

/// Settings for one analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    input_dir: PathBuf,
    output_dir: PathBuf,
    source_prefix: String,
    source_suffix: String,
    min_distinct_sizes: usize,
    write_parquet: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            source_prefix: DEFAULT_SOURCE_PREFIX.to_string(),
            source_suffix: DEFAULT_SOURCE_SUFFIX.to_string(),
            min_distinct_sizes: DEFAULT_MIN_DISTINCT_SIZES,
            write_parquet: true,
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration builder
    #[must_use]
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// Directory scanned for source tables.
    #[must_use]
    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    /// Directory reports are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Source file name prefix.
    #[must_use]
    pub fn source_prefix(&self) -> &str {
        &self.source_prefix
    }

    /// Source file name suffix.
    #[must_use]
    pub fn source_suffix(&self) -> &str {
        &self.source_suffix
    }

    /// Minimum number of distinct sizes for complexity classification.
    #[must_use]
    pub const fn min_distinct_sizes(&self) -> usize {
        self.min_distinct_sizes
    }

    /// Whether the combined table is also exported as Parquet.
    #[must_use]
    pub const fn write_parquet(&self) -> bool {
        self.write_parquet
    }

    /// Whether a file name looks like a source table.
    #[must_use]
    pub fn matches_source(&self, file_name: &str) -> bool {
        file_name.len() > self.source_prefix.len() + self.source_suffix.len()
            && file_name.starts_with(&self.source_prefix)
            && file_name.ends_with(&self.source_suffix)
    }
}

/// Builder for `AnalysisConfig`
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl AnalysisConfigBuilder {
    /// Set the directory scanned for source tables
    #[must_use]
    pub fn input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.input_dir = dir.into();
        self
    }

    /// Set the directory reports are written to
    #[must_use]
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    /// Set the source file name prefix
    #[must_use]
    pub fn source_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.source_prefix = prefix.into();
        self
    }

    /// Set the source file name suffix
    #[must_use]
    pub fn source_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.source_suffix = suffix.into();
        self
    }

    /// Set the minimum number of distinct sizes for classification
    #[must_use]
    pub const fn min_distinct_sizes(mut self, count: usize) -> Self {
        self.config.min_distinct_sizes = count;
        self
    }

    /// Enable or disable the Parquet export
    #[must_use]
    pub const fn write_parquet(mut self, enabled: bool) -> Self {
        self.config.write_parquet = enabled;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the suffix is empty or fewer than
    /// three distinct sizes are required (a cubic fit needs at least three).
    pub fn build(self) -> Result<AnalysisConfig> {
        if self.config.source_suffix.is_empty() {
            return Err(Error::InvalidInput(
                "source suffix must not be empty".to_string(),
            ));
        }
        if self.config.min_distinct_sizes < DEFAULT_MIN_DISTINCT_SIZES {
            return Err(Error::InvalidInput(format!(
                "min_distinct_sizes must be at least {DEFAULT_MIN_DISTINCT_SIZES}, got {}",
                self.config.min_distinct_sizes
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::builder().build().unwrap();
        assert_eq!(config.input_dir(), Path::new("results"));
        assert_eq!(config.output_dir(), Path::new("analysis_results"));
        assert_eq!(config.min_distinct_sizes(), 3);
        assert!(config.write_parquet());
    }

    #[test]
    fn test_rejects_too_few_sizes() {
        let err = AnalysisConfig::builder().min_distinct_sizes(2).build();
        assert!(matches!(err, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_matches_source() {
        let config = AnalysisConfig::default();
        assert!(config.matches_source("benchmark_rust_results.csv"));
        assert!(!config.matches_source("benchmark__results.csv"));
        assert!(!config.matches_source("combined_results.csv"));
        assert!(!config.matches_source("benchmark_rust_results.txt"));
    }
}
