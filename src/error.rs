//! Error types for matbench
//!
//! Per-source and per-language variants are non-fatal: the pipeline records
//! them in the run manifest and keeps going. Only `NoValidSources` aborts a run.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// matbench error types
#[derive(Error, Debug)]
pub enum Error {
    /// A source table could not be parsed and was skipped
    #[error("Failed to parse source '{source_name}': {reason}")]
    SourceParse {
        /// File name (or label) of the offending source
        source_name: String,
        /// What was wrong with it
        reason: String,
    },

    /// No source table produced any usable record
    #[error("No valid benchmark sources found in {searched}\nRun the language benchmarks first so result tables exist.")]
    NoValidSources {
        /// Where the ingestor looked
        searched: String,
    },

    /// All observed times for a language are identical, so R² is undefined
    #[error("Degenerate complexity fit for '{language}': observed times have zero variance")]
    DegenerateFit {
        /// Language whose classification was omitted
        language: String,
    },

    /// The least-squares system could not be solved
    #[error("Numerical failure fitting '{language}': {reason}")]
    FitNumerical {
        /// Language whose classification was omitted
        language: String,
        /// Solver diagnostic
        reason: String,
    },

    /// Invalid configuration or argument
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Columnar export error
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Parquet error
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Finalizing a temporary output file failed
    #[error("Failed to finalize output file: {0}")]
    Persist(#[from] tempfile::PersistError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error aborts the whole run.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::SourceParse { .. } | Self::DegenerateFit { .. } | Self::FitNumerical { .. }
        )
    }
}
