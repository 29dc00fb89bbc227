//! Record Store - in-memory mapping from language to its benchmark records
//!
//! Languages are kept in a `BTreeMap` so every table derived from the store
//! iterates in a stable order regardless of ingest order.

use std::collections::BTreeMap;

use super::BenchmarkRecord;

/// In-memory store of derived benchmark records, grouped by language.
///
/// Within a language, records keep the order in which they were ingested.
#[derive(Debug, Default, Clone)]
pub struct RecordStore {
    by_language: BTreeMap<String, Vec<BenchmarkRecord>>,
}

impl RecordStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct languages.
    #[must_use]
    pub fn language_count(&self) -> usize {
        self.by_language.len()
    }

    /// Total number of records across all languages.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.by_language.values().map(Vec::len).sum()
    }

    /// Add a record under its own language.
    pub fn add_record(&mut self, record: BenchmarkRecord) {
        self.by_language
            .entry(record.language().to_string())
            .or_default()
            .push(record);
    }

    /// Language identifiers in sorted order.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.by_language.keys().map(String::as_str)
    }

    /// Records for one language, in ingest order.
    #[must_use]
    pub fn records_for(&self, language: &str) -> &[BenchmarkRecord] {
        self.by_language
            .get(language)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// All records, grouped by language.
    pub fn iter(&self) -> impl Iterator<Item = &BenchmarkRecord> {
        self.by_language.values().flatten()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut BenchmarkRecord> {
        self.by_language.values_mut().flatten()
    }

    /// Distinct matrix sizes across all languages, ascending.
    #[must_use]
    pub fn matrix_sizes(&self) -> Vec<u32> {
        let mut sizes: Vec<u32> = self.iter().map(BenchmarkRecord::matrix_size).collect();
        sizes.sort_unstable();
        sizes.dedup();
        sizes
    }
}

impl Extend<BenchmarkRecord> for RecordStore {
    fn extend<T: IntoIterator<Item = BenchmarkRecord>>(&mut self, iter: T) {
        for record in iter {
            self.add_record(record);
        }
    }
}

impl FromIterator<BenchmarkRecord> for RecordStore {
    fn from_iter<T: IntoIterator<Item = BenchmarkRecord>>(iter: T) -> Self {
        let mut store = Self::new();
        store.extend(iter);
        store
    }
}
