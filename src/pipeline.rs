//! Pipeline driver
//!
//! ```text
//! Ingestor ──> Deriver ──> Aggregator ──> Classifier ──> Emitter
//! ```
//!
//! Each stage consumes the complete output of the previous one. Analysis is
//! separated from emission so the in-memory results can be inspected without
//! touching the file system.

use tracing::info;

use crate::aggregate::{self, Aggregation};
use crate::complexity::{Classification, ComplexityClassifier};
use crate::config::AnalysisConfig;
use crate::ingest::{Ingestion, Ingestor, SourceTable};
use crate::record::RecordStore;
use crate::report::ReportEmitter;
use crate::run::{AnalysisRun, RunStatus};
use crate::Result;

/// In-memory result of one run.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Derived and annotated records
    pub store: RecordStore,
    /// Summary table and rankings
    pub aggregation: Aggregation,
    /// Complexity fits and skipped languages
    pub classification: Classification,
    /// Run manifest
    pub run: AnalysisRun,
}

/// Runs the analysis stages for one configuration.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: AnalysisConfig,
}

impl Pipeline {
    /// Create a pipeline for the given configuration
    #[must_use]
    pub const fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    #[must_use]
    pub const fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Ingest the configured input directory, analyze and write all reports.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NoValidSources`] before anything is written
    /// when no source parsed, or an I/O error from the emitter.
    pub fn run(&self) -> Result<Analysis> {
        let mut run = AnalysisRun::with_timestamp_id();
        run.start();

        let ingestion = Ingestor::new(self.config.clone()).ingest_dir()?;
        let mut analysis = self.analyze_ingestion(ingestion, run);
        self.emit(&mut analysis)?;
        Ok(analysis)
    }

    /// Analyze explicit source tables without writing anything.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NoValidSources`] when no source parsed.
    pub fn analyze_sources(
        &self,
        sources: impl IntoIterator<Item = SourceTable>,
    ) -> Result<Analysis> {
        let mut run = AnalysisRun::with_timestamp_id();
        run.start();

        let ingestion = Ingestor::new(self.config.clone()).ingest_sources(sources)?;
        Ok(self.analyze_ingestion(ingestion, run))
    }

    /// Write the reports of a finished analysis and mark the run successful.
    ///
    /// # Errors
    ///
    /// Returns error if any output file cannot be written; the run is then
    /// marked failed.
    pub fn emit(&self, analysis: &mut Analysis) -> Result<()> {
        let emitter = ReportEmitter::new(self.config.output_dir(), self.config.write_parquet());
        let written = emitter.emit_tables(
            &analysis.store,
            &analysis.aggregation,
            &analysis.classification,
            &mut analysis.run,
        );
        if let Err(e) = written {
            analysis.run.complete(RunStatus::Failed);
            return Err(e);
        }

        analysis.run.complete(RunStatus::Success);
        let manifest = emitter.emit_manifest(&mut analysis.run)?;
        info!(
            manifest = %manifest.display(),
            outputs = analysis.run.outputs().len(),
            "analysis complete"
        );
        Ok(())
    }

    fn analyze_ingestion(&self, ingestion: Ingestion, mut run: AnalysisRun) -> Analysis {
        run.record_ingestion(ingestion.ingested.clone(), ingestion.skipped.clone());

        let mut store = ingestion.into_store();
        info!(
            languages = store.language_count(),
            records = store.record_count(),
            sizes = ?store.matrix_sizes(),
            "derived record statistics"
        );

        let aggregation = aggregate::aggregate(&mut store);
        let classification =
            ComplexityClassifier::new(self.config.min_distinct_sizes()).classify(&store);
        run.record_skipped_languages(classification.skipped.clone());

        Analysis {
            store,
            aggregation,
            classification,
            run,
        }
    }
}
