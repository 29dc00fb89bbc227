//! Cross-language aggregation and ranking
//!
//! Two explicit passes over the record store:
//!
//! 1. Fastest-time join: the minimum `average_time` per matrix size is
//!    computed and every record is annotated with it and with its
//!    `relative_performance`.
//! 2. Group-by: records sharing `(language, matrix_size)` are folded into one
//!    [`SummaryRow`]; the rows are ordered by size, then by mean time, which
//!    is the ranking reported to the user.

mod summary;

pub use summary::{Ranking, SummaryRow};

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::record::{BenchmarkRecord, RecordStore};

/// Result of aggregating a record store.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    fastest_by_size: BTreeMap<u32, f64>,
    summary: Vec<SummaryRow>,
}

impl Aggregation {
    /// Fastest mean time per matrix size.
    #[must_use]
    pub const fn fastest_by_size(&self) -> &BTreeMap<u32, f64> {
        &self.fastest_by_size
    }

    /// Summary table in ranking order.
    #[must_use]
    pub fn summary(&self) -> &[SummaryRow] {
        &self.summary
    }

    /// One ranking per matrix size, ascending by size.
    #[must_use]
    pub fn rankings(&self) -> Vec<Ranking<'_>> {
        self.summary
            .chunk_by(|a, b| a.matrix_size == b.matrix_size)
            .map(Ranking::new)
            .collect()
    }

    /// Ranking for one matrix size.
    #[must_use]
    pub fn ranking_for(&self, matrix_size: u32) -> Option<Ranking<'_>> {
        self.rankings()
            .into_iter()
            .find(|ranking| ranking.matrix_size() == matrix_size)
    }
}

/// Annotate records with the fastest time at their size and summarize.
#[must_use]
pub fn aggregate(store: &mut RecordStore) -> Aggregation {
    let fastest_by_size = annotate_fastest(store);
    let summary = summarize(store);
    info!(
        sizes = fastest_by_size.len(),
        rows = summary.len(),
        "aggregated benchmark records"
    );
    Aggregation {
        fastest_by_size,
        summary,
    }
}

/// Compute the minimum `average_time` per size and annotate every record.
///
/// Records tied at the minimum all get a relative performance of exactly 1.0.
pub fn annotate_fastest(store: &mut RecordStore) -> BTreeMap<u32, f64> {
    let mut fastest: BTreeMap<u32, f64> = BTreeMap::new();
    for record in store.iter() {
        fastest
            .entry(record.matrix_size())
            .and_modify(|best| *best = best.min(record.average_time()))
            .or_insert(record.average_time());
    }

    for record in store.iter_mut() {
        if let Some(&best) = fastest.get(&record.matrix_size()) {
            record.annotate_fastest(best);
        }
    }

    for (size, best) in &fastest {
        debug!(matrix_size = size, fastest_time = best, "fastest time at size");
    }
    fastest
}

#[derive(Debug)]
struct Accumulator {
    count: usize,
    average_sum: f64,
    min_time: f64,
    max_time: f64,
    std_dev_sum: f64,
    relative_sum: f64,
}

impl Accumulator {
    const fn new() -> Self {
        Self {
            count: 0,
            average_sum: 0.0,
            min_time: f64::INFINITY,
            max_time: f64::NEG_INFINITY,
            std_dev_sum: 0.0,
            relative_sum: 0.0,
        }
    }

    fn fold(&mut self, record: &BenchmarkRecord) {
        self.count += 1;
        self.average_sum += record.average_time();
        self.min_time = self.min_time.min(record.min_time());
        self.max_time = self.max_time.max(record.max_time());
        self.std_dev_sum += record.std_dev();
        self.relative_sum += record.relative_performance().unwrap_or(1.0);
    }

    #[allow(clippy::cast_precision_loss)]
    fn finish(self, language: String, matrix_size: u32) -> SummaryRow {
        let n = self.count as f64;
        SummaryRow {
            language,
            matrix_size,
            average_time: self.average_sum / n,
            min_time: self.min_time,
            max_time: self.max_time,
            std_dev: self.std_dev_sum / n,
            relative_performance: self.relative_sum / n,
            record_count: self.count,
            rank: 0,
        }
    }
}

/// Fold records into one row per `(language, matrix_size)`, ranked.
///
/// Rows are sorted by ascending size, then ascending mean time, then language
/// name. Rows with equal mean time at a size share a rank.
#[must_use]
pub fn summarize(store: &RecordStore) -> Vec<SummaryRow> {
    let mut groups: BTreeMap<(String, u32), Accumulator> = BTreeMap::new();
    for record in store.iter() {
        groups
            .entry((record.language().to_string(), record.matrix_size()))
            .or_insert_with(Accumulator::new)
            .fold(record);
    }

    let mut rows: Vec<SummaryRow> = groups
        .into_iter()
        .map(|((language, size), acc)| acc.finish(language, size))
        .collect();

    rows.sort_by(|a, b| {
        a.matrix_size
            .cmp(&b.matrix_size)
            .then(a.average_time.total_cmp(&b.average_time))
            .then_with(|| a.language.cmp(&b.language))
    });

    assign_ranks(&mut rows);
    rows
}

/// Competition ranking within each size: 1, 1, 3 for a tie at the top.
fn assign_ranks(rows: &mut [SummaryRow]) {
    for group in rows.chunk_by_mut(|a, b| a.matrix_size == b.matrix_size) {
        let mut previous: Option<(f64, usize)> = None;
        for (index, row) in group.iter_mut().enumerate() {
            row.rank = match previous {
                Some((average, rank)) if average == row.average_time => rank,
                _ => index + 1,
            };
            previous = Some((row.average_time, row.rank));
        }
    }
}
