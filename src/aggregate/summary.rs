//! Summary rows and per-size rankings

use serde::{Deserialize, Serialize};

/// Grouped statistics for one `(language, matrix_size)` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    /// Language identifier
    pub language: String,
    /// Square matrix dimension
    pub matrix_size: u32,
    /// Mean of the records' `average_time`
    pub average_time: f64,
    /// Minimum of the records' `min_time`
    pub min_time: f64,
    /// Maximum of the records' `max_time`
    pub max_time: f64,
    /// Mean of the records' `std_dev`
    pub std_dev: f64,
    /// Mean of the records' `relative_performance`
    pub relative_performance: f64,
    /// Number of records folded into this row
    #[serde(skip)]
    pub record_count: usize,
    /// Position at this size, 1 = fastest; ties share a position
    #[serde(skip)]
    pub rank: usize,
}

/// Ordered view of the summary rows at one matrix size.
#[derive(Debug, Clone, Copy)]
pub struct Ranking<'a> {
    rows: &'a [SummaryRow],
}

impl<'a> Ranking<'a> {
    /// Wrap a non-empty, already ordered slice of rows sharing one size.
    pub(crate) const fn new(rows: &'a [SummaryRow]) -> Self {
        Self { rows }
    }

    /// Matrix size this ranking covers.
    #[must_use]
    pub fn matrix_size(&self) -> u32 {
        self.rows.first().map_or(0, |row| row.matrix_size)
    }

    /// Rows from fastest to slowest.
    #[must_use]
    pub const fn rows(&self) -> &'a [SummaryRow] {
        self.rows
    }

    /// Rows ranked first (more than one on a tie).
    #[must_use]
    pub fn fastest(&self) -> &'a [SummaryRow] {
        let end = self.rows.iter().take_while(|row| row.rank == 1).count();
        &self.rows[..end]
    }

    /// Rank of a language at this size.
    #[must_use]
    pub fn position(&self, language: &str) -> Option<usize> {
        self.rows
            .iter()
            .find(|row| row.language == language)
            .map(|row| row.rank)
    }
}
