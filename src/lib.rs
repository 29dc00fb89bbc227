//! # matbench: Cross-Language Matrix Multiplication Benchmark Analysis
//!
//! Each language runner times a naïve triple-loop matrix multiplication and
//! appends its samples to `results/benchmark_<language>_results.csv`.
//! matbench reads those tables, derives per-run statistics, ranks the
//! languages at every matrix size, and classifies how each language's runtime
//! scales (linear, quadratic or cubic) by least-squares fitting.
//!
//! ## Pipeline
//!
//! ```text
//! ingest ──> metrics ──> aggregate ──> complexity ──> report
//! ```
//!
//! Broken source tables and unclassifiable languages are reported and
//! skipped. The run only fails when no source table could be read.
//!
//! ## Example Usage
//!
//! ```rust
//! use std::io::Cursor;
//! use matbench::config::AnalysisConfig;
//! use matbench::ingest::SourceTable;
//! use matbench::pipeline::Pipeline;
//!
//! let csv = "language,matrix_size,iterations,individual_times\n\
//!            Rust,100,2,0.010 0.012\n\
//!            Rust,200,2,0.080 0.082\n";
//! let source = SourceTable::from_reader("benchmark_rust_results.csv", Cursor::new(csv));
//!
//! let pipeline = Pipeline::new(AnalysisConfig::default());
//! let analysis = pipeline.analyze_sources([source])?;
//! assert_eq!(analysis.aggregation.summary().len(), 2);
//! # Ok::<(), matbench::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod aggregate;
pub mod complexity;
pub mod config;
pub mod error;
pub mod ingest;
pub mod metrics;
pub mod pipeline;
pub mod record;
pub mod report;
pub mod run;
pub mod storage;

pub use error::{Error, Result};
