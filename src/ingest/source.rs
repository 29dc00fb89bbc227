//! Source table parsing
//!
//! One source table holds the rows one language runner appended:
//!
//! ```text
//! language,matrix_size,iterations,individual_times,average_time
//! Rust,100,3,0.001200 0.001150 0.001180,0.001177
//! ```
//!
//! `language` and `average_time` are optional columns. The whole table is
//! rejected on the first bad row so a half-read source never reaches the
//! aggregator.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use serde::Deserialize;

use crate::record::RawRecord;
use crate::{Error, Result};

/// Row layout shared by every language runner.
#[derive(Debug, Deserialize)]
struct SourceRow {
    #[serde(default)]
    language: Option<String>,
    matrix_size: u32,
    iterations: u32,
    individual_times: String,
    #[serde(default)]
    average_time: Option<f64>,
}

/// A named, not yet parsed result table.
pub struct SourceTable {
    name: String,
    reader: Box<dyn Read>,
}

impl std::fmt::Debug for SourceTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceTable").field("name", &self.name).finish_non_exhaustive()
    }
}

impl SourceTable {
    /// Wrap any reader (file, buffer, socket) as a source.
    pub fn from_reader(name: impl Into<String>, reader: impl Read + 'static) -> Self {
        Self {
            name: name.into(),
            reader: Box::new(reader),
        }
    }

    /// Open a source table on disk. The file name becomes the source name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceParse`] if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        let file = File::open(path).map_err(|e| Error::SourceParse {
            source_name: name.clone(),
            reason: format!("cannot open file: {e}"),
        })?;
        Ok(Self::from_reader(name, file))
    }

    /// Source name (usually the file name).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parse every row of the table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceParse`] naming this source if the table is
    /// empty, a row is malformed, a timing token is not a non-negative number,
    /// the sample count does not match `iterations`, or no language can be
    /// determined.
    pub fn parse(self) -> Result<Vec<RawRecord>> {
        let name = self.name;
        let fail = |reason: String| Error::SourceParse {
            source_name: name.clone(),
            reason,
        };

        let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(self.reader);
        let headers = reader.headers().map_err(|e| fail(e.to_string()))?;
        if headers.is_empty() || headers.iter().all(str::is_empty) {
            return Err(fail("table has no header row".to_string()));
        }

        let fallback_language = language_from_name(&name);
        let mut records = Vec::new();

        for (index, row) in reader.deserialize::<SourceRow>().enumerate() {
            // Header is line 1
            let line = index + 2;
            let row = row.map_err(|e| fail(e.to_string()))?;

            let language = match row.language.filter(|l| !l.is_empty()) {
                Some(language) => language,
                None => fallback_language.clone().ok_or_else(|| {
                    fail(format!(
                        "line {line}: no language column and none recoverable from the source name"
                    ))
                })?,
            };
            if row.matrix_size == 0 {
                return Err(fail(format!("line {line}: matrix_size must be positive")));
            }
            if row.iterations == 0 {
                return Err(fail(format!("line {line}: iterations must be positive")));
            }

            let times = parse_times(&row.individual_times).map_err(|e| match e {
                Error::InvalidInput(reason) => fail(format!("line {line}: {reason}")),
                other => other,
            })?;
            if times.len() != row.iterations as usize {
                return Err(fail(format!(
                    "line {line}: {} timing samples but iterations = {}",
                    times.len(),
                    row.iterations
                )));
            }

            let mut builder = RawRecord::builder(language, row.matrix_size)
                .individual_times(times)
                .iterations(row.iterations);
            if let Some(average) = row.average_time {
                if !average.is_finite() || average < 0.0 {
                    return Err(fail(format!(
                        "line {line}: average_time {average} is not a non-negative number"
                    )));
                }
                builder = builder.average_time(average);
            }
            records.push(builder.build());
        }

        Ok(records)
    }
}

/// Recover the language token embedded in a source name.
///
/// `benchmark_rust_results.csv` yields `rust`: the token between the first
/// and second underscore of the file name.
#[must_use]
pub fn language_from_name(name: &str) -> Option<String> {
    let file_name = Path::new(name)
        .file_name()
        .map_or_else(|| name.to_string(), |n| n.to_string_lossy().into_owned());
    file_name
        .split('_')
        .nth(1)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// Parse a serialized timing sequence.
///
/// Tokens are separated by whitespace, commas or semicolons.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] naming the first token that is not a
/// finite, non-negative number, or if the sequence is empty.
pub fn parse_times(field: &str) -> Result<Vec<f64>> {
    let times = field
        .split(|c: char| c.is_whitespace() || c == ',' || c == ';')
        .filter(|token| !token.is_empty())
        .map(|token| match token.parse::<f64>() {
            Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
            Ok(value) => Err(Error::InvalidInput(format!(
                "timing {value} is not a non-negative number"
            ))),
            Err(_) => Err(Error::InvalidInput(format!(
                "non-numeric timing token '{token}'"
            ))),
        })
        .collect::<Result<Vec<f64>>>()?;

    if times.is_empty() {
        return Err(Error::InvalidInput("individual_times is empty".to_string()));
    }
    Ok(times)
}
