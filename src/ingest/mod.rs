//! Record ingestion
//!
//! Finds the per-language result tables, parses each one independently and
//! keeps whatever parsed. A broken table is skipped with a warning; the run
//! only fails when nothing usable was found at all.

mod source;

pub use source::{language_from_name, parse_times, SourceTable};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::AnalysisConfig;
use crate::metrics;
use crate::record::{RawRecord, RecordStore};
use crate::{Error, Result};

/// A source that was skipped, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedSource {
    /// Source name
    pub source: String,
    /// Parse failure description
    pub reason: String,
}

/// Everything the ingestor produced.
#[derive(Debug, Clone, Default)]
pub struct Ingestion {
    /// Rows from every source that parsed, in source order
    pub records: Vec<RawRecord>,
    /// Names of the sources that parsed
    pub ingested: Vec<String>,
    /// Sources that were skipped
    pub skipped: Vec<SkippedSource>,
}

impl Ingestion {
    /// Derive statistics for every record and group them by language.
    #[must_use]
    pub fn into_store(self) -> RecordStore {
        self.records.into_iter().map(metrics::derive).collect()
    }
}

/// Reads source tables into raw records.
#[derive(Debug, Clone)]
pub struct Ingestor {
    config: AnalysisConfig,
}

impl Ingestor {
    /// Create an ingestor for the given configuration
    #[must_use]
    pub const fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Source table paths in the input directory, sorted by file name.
    ///
    /// A missing input directory yields no sources.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the directory exists but cannot be listed.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        let entries = match std::fs::read_dir(self.config.input_dir()) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Error::Io(e)),
        };

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry?;
            let matches = entry
                .file_name()
                .to_str()
                .is_some_and(|name| self.config.matches_source(name));
            if matches && entry.file_type()?.is_file() {
                paths.push(entry.path());
            }
        }
        paths.sort();
        Ok(paths)
    }

    /// Discover and ingest every source table in the input directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoValidSources`] if no table parsed or the parsed
    /// tables hold no rows, or [`Error::Io`] if discovery fails.
    pub fn ingest_dir(&self) -> Result<Ingestion> {
        let paths = self.discover()?;
        info!(
            dir = %self.config.input_dir().display(),
            sources = paths.len(),
            "discovered source tables"
        );

        let mut opened = Vec::with_capacity(paths.len());
        let mut skipped = Vec::new();
        for path in paths {
            match SourceTable::open(&path) {
                Ok(table) => opened.push(table),
                Err(e) => skipped.push(skip(&e, &path.display().to_string())),
            }
        }

        let mut ingestion = self.ingest_sources(opened)?;
        skipped.append(&mut ingestion.skipped);
        ingestion.skipped = skipped;
        Ok(ingestion)
    }

    /// Ingest an explicit set of source tables.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoValidSources`] if no table parsed or the parsed
    /// tables hold no rows.
    pub fn ingest_sources(
        &self,
        sources: impl IntoIterator<Item = SourceTable>,
    ) -> Result<Ingestion> {
        let mut ingestion = Ingestion::default();

        for table in sources {
            let name = table.name().to_string();
            match table.parse() {
                Ok(mut records) => {
                    info!(source = %name, rows = records.len(), "ingested source table");
                    ingestion.records.append(&mut records);
                    ingestion.ingested.push(name);
                }
                Err(e) => ingestion.skipped.push(skip(&e, &name)),
            }
        }

        if ingestion.records.is_empty() {
            return Err(Error::NoValidSources {
                searched: self.config.input_dir().display().to_string(),
            });
        }
        Ok(ingestion)
    }
}

fn skip(error: &Error, source: &str) -> SkippedSource {
    warn!(source, error = %error, "skipping source table");
    let reason = match error {
        Error::SourceParse { reason, .. } => reason.clone(),
        other => other.to_string(),
    };
    SkippedSource {
        source: source.to_string(),
        reason,
    }
}
