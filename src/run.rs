//! Analysis Run - manifest of one pipeline invocation
//!
//! Written next to the reports as `analysis_run.json` so the skipped sources
//! and languages of a run stay visible after the logs are gone.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::complexity::SkippedLanguage;
use crate::ingest::SkippedSource;

/// Status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// Run is created but not yet started.
    Pending,
    /// Run is currently executing.
    Running,
    /// Run completed and reports were written.
    Success,
    /// Run aborted.
    Failed,
}

/// Manifest of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisRun {
    run_id: String,
    status: RunStatus,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
    ingested_sources: Vec<String>,
    skipped_sources: Vec<SkippedSource>,
    skipped_languages: Vec<SkippedLanguage>,
    outputs: Vec<PathBuf>,
}

impl AnalysisRun {
    /// Create a new run in Pending status.
    #[must_use]
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            status: RunStatus::Pending,
            started_at: None,
            ended_at: None,
            ingested_sources: Vec::new(),
            skipped_sources: Vec::new(),
            skipped_languages: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Create a run whose id is derived from the current time.
    #[must_use]
    pub fn with_timestamp_id() -> Self {
        Self::new(format!("run-{}", Utc::now().format("%Y%m%dT%H%M%S%.3fZ")))
    }

    /// Get the run ID.
    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Get the current run status.
    #[must_use]
    pub const fn status(&self) -> RunStatus {
        self.status
    }

    /// Get the start timestamp, if the run has started.
    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Get the end timestamp, if the run has completed.
    #[must_use]
    pub const fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// Sources that contributed records.
    #[must_use]
    pub fn ingested_sources(&self) -> &[String] {
        &self.ingested_sources
    }

    /// Sources that were skipped.
    #[must_use]
    pub fn skipped_sources(&self) -> &[SkippedSource] {
        &self.skipped_sources
    }

    /// Languages without a complexity fit.
    #[must_use]
    pub fn skipped_languages(&self) -> &[SkippedLanguage] {
        &self.skipped_languages
    }

    /// Files written by the emitter.
    #[must_use]
    pub fn outputs(&self) -> &[PathBuf] {
        &self.outputs
    }

    /// Start the run, transitioning from Pending to Running.
    pub fn start(&mut self) {
        self.status = RunStatus::Running;
        self.started_at = Some(Utc::now());
    }

    /// Record the outcome of ingestion.
    pub fn record_ingestion(&mut self, ingested: Vec<String>, skipped: Vec<SkippedSource>) {
        self.ingested_sources = ingested;
        self.skipped_sources = skipped;
    }

    /// Record the languages the classifier left out.
    pub fn record_skipped_languages(&mut self, skipped: Vec<SkippedLanguage>) {
        self.skipped_languages = skipped;
    }

    /// Record an emitted file.
    pub fn record_output(&mut self, path: PathBuf) {
        self.outputs.push(path);
    }

    /// Complete the run with the given final status.
    pub fn complete(&mut self, status: RunStatus) {
        self.status = status;
        self.ended_at = Some(Utc::now());
    }
}
