//! Benchmark record model
//!
//! ## Lifecycle
//!
//! ```text
//! source table ──> RawRecord ──derive──> BenchmarkRecord ──annotate──> RecordStore
//!                  (ingest)             (metrics)                     (aggregate)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use matbench::metrics;
//! use matbench::record::{AverageSource, RawRecord, RecordStore};
//!
//! let raw = RawRecord::new("Rust", 100, vec![0.010, 0.012, 0.011]);
//! let record = metrics::derive(raw);
//! assert_eq!(record.average_source(), AverageSource::Derived);
//!
//! let mut store = RecordStore::new();
//! store.add_record(record);
//! assert_eq!(store.record_count(), 1);
//! ```

mod benchmark_record;
mod store;

pub use benchmark_record::{AverageSource, BenchmarkRecord, RawRecord, RawRecordBuilder};
pub use store::RecordStore;
