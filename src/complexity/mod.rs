//! Complexity classification
//!
//! For every language with enough distinct matrix sizes, linear, quadratic
//! and cubic models of `average_time` against `matrix_size` are fitted and
//! scored by R². The best-scoring model is the language's observed scaling
//! class; a naïve triple loop should land on cubic.
//!
//! Failures are per language: a degenerate or numerically broken series is
//! reported and skipped while the others are still classified.

pub mod polyfit;

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::record::RecordStore;
use crate::{Error, Result};

/// R² values closer than this are treated as equal; the simpler model wins.
pub const R_SQUARED_TIE_TOLERANCE: f64 = 1e-12;

/// Polynomial model candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelDegree {
    /// O(n)
    Linear = 1,
    /// O(n²)
    Quadratic = 2,
    /// O(n³)
    Cubic = 3,
}

impl ModelDegree {
    /// All candidates, simplest first.
    pub const ALL: [Self; 3] = [Self::Linear, Self::Quadratic, Self::Cubic];

    /// Polynomial degree.
    #[must_use]
    pub const fn degree(self) -> usize {
        self as usize
    }

    /// Model name as written to reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Quadratic => "quadratic",
            Self::Cubic => "cubic",
        }
    }
}

impl fmt::Display for ModelDegree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One fitted candidate model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolynomialModel {
    /// Model degree
    pub degree: ModelDegree,
    /// Coefficients on the original size scale, highest degree first
    pub coefficients: Vec<f64>,
    /// Coefficient of determination against the observed times
    pub r_squared: f64,
}

/// Complexity classification of one language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexityFit {
    language: String,
    models: Vec<PolynomialModel>,
    best_model: ModelDegree,
}

impl ComplexityFit {
    /// Language identifier.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Degree of the best-fitting model.
    #[must_use]
    pub const fn best_model(&self) -> ModelDegree {
        self.best_model
    }

    /// Every candidate that was fitted, simplest first.
    #[must_use]
    pub fn models(&self) -> &[PolynomialModel] {
        &self.models
    }

    /// Candidate of a given degree.
    #[must_use]
    pub fn model(&self, degree: ModelDegree) -> Option<&PolynomialModel> {
        self.models.iter().find(|model| model.degree == degree)
    }

    /// R² of the best model.
    #[must_use]
    pub fn r_squared(&self) -> f64 {
        self.best().map_or(f64::NAN, |model| model.r_squared)
    }

    /// Coefficients of the best model, highest degree first.
    #[must_use]
    pub fn coefficients(&self) -> &[f64] {
        self.best()
            .map(|model| model.coefficients.as_slice())
            .unwrap_or_default()
    }

    fn best(&self) -> Option<&PolynomialModel> {
        self.model(self.best_model)
    }
}

/// Why a language produced no fit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// Too few distinct sizes; not an error
    InsufficientSizes {
        /// Distinct sizes observed
        distinct: usize,
        /// Distinct sizes required
        required: usize,
    },
    /// All observed times identical
    Degenerate,
    /// Solver failure
    Numerical {
        /// Solver diagnostic
        reason: String,
    },
}

/// A language left out of the classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedLanguage {
    /// Language identifier
    pub language: String,
    /// Why it was skipped
    pub reason: SkipReason,
}

/// Result of classifying one language.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Every candidate model was fitted
    Fitted(ComplexityFit),
    /// Too few distinct sizes; not an error
    Skipped(SkipReason),
}

/// Classification results for all languages.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    /// Fits, ordered by language
    pub fits: Vec<ComplexityFit>,
    /// Languages without a fit
    pub skipped: Vec<SkippedLanguage>,
}

impl Classification {
    /// Fit for a language, if it was classified.
    #[must_use]
    pub fn fit_for(&self, language: &str) -> Option<&ComplexityFit> {
        self.fits.iter().find(|fit| fit.language == language)
    }
}

/// Fits polynomial models per language.
#[derive(Debug, Clone, Copy)]
pub struct ComplexityClassifier {
    min_distinct_sizes: usize,
}

impl Default for ComplexityClassifier {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MIN_DISTINCT_SIZES)
    }
}

impl ComplexityClassifier {
    /// Create a classifier requiring `min_distinct_sizes` distinct sizes.
    #[must_use]
    pub const fn new(min_distinct_sizes: usize) -> Self {
        Self { min_distinct_sizes }
    }

    /// Classify every language in the store.
    #[must_use]
    pub fn classify(&self, store: &RecordStore) -> Classification {
        let mut classification = Classification::default();

        for language in store.languages() {
            let points: Vec<(f64, f64)> = store
                .records_for(language)
                .iter()
                .map(|r| (f64::from(r.matrix_size()), r.average_time()))
                .collect();

            match self.classify_language(language, &points) {
                Ok(Outcome::Fitted(fit)) => {
                    info!(
                        language,
                        best_model = %fit.best_model(),
                        r_squared = fit.r_squared(),
                        "classified complexity"
                    );
                    classification.fits.push(fit);
                }
                Ok(Outcome::Skipped(reason)) => {
                    info!(language, ?reason, "too few sizes for complexity fit");
                    classification.skipped.push(SkippedLanguage {
                        language: language.to_string(),
                        reason,
                    });
                }
                Err(e) => {
                    warn!(language, error = %e, "complexity fit omitted");
                    let reason = match e {
                        Error::FitNumerical { reason, .. } => SkipReason::Numerical { reason },
                        _ => SkipReason::Degenerate,
                    };
                    classification.skipped.push(SkippedLanguage {
                        language: language.to_string(),
                        reason,
                    });
                }
            }
        }

        classification
    }

    /// Classify one language from its `(size, time)` observations.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DegenerateFit`] when every observed time is identical
    /// and [`Error::FitNumerical`] when a least-squares solve fails.
    pub fn classify_language(&self, language: &str, points: &[(f64, f64)]) -> Result<Outcome> {
        let distinct = points
            .iter()
            .map(|(size, _)| size.to_bits())
            .collect::<BTreeSet<u64>>()
            .len();
        if distinct < self.min_distinct_sizes {
            return Ok(Outcome::Skipped(SkipReason::InsufficientSizes {
                distinct,
                required: self.min_distinct_sizes,
            }));
        }

        let (sizes, times): (Vec<f64>, Vec<f64>) = points.iter().copied().unzip();
        if times.windows(2).all(|pair| pair[0] == pair[1]) {
            return Err(Error::DegenerateFit {
                language: language.to_string(),
            });
        }

        let mut models = Vec::with_capacity(ModelDegree::ALL.len());
        for degree in ModelDegree::ALL {
            let numerical = |reason: String| Error::FitNumerical {
                language: language.to_string(),
                reason: format!("{degree} fit: {reason}"),
            };

            let poly = polyfit::fit(&sizes, &times, degree.degree())
                .map_err(|e| numerical(e.to_string()))?;
            let predicted: Vec<f64> = sizes.iter().map(|&size| poly.predict(size)).collect();
            let r_squared = polyfit::r_squared(&times, &predicted).ok_or_else(|| {
                Error::DegenerateFit {
                    language: language.to_string(),
                }
            })?;
            if !r_squared.is_finite() {
                return Err(numerical(format!("R² is {r_squared}")));
            }

            models.push(PolynomialModel {
                degree,
                coefficients: poly.coefficients(),
                r_squared,
            });
        }

        let best_model = select_best(&models).unwrap_or(ModelDegree::Linear);
        Ok(Outcome::Fitted(ComplexityFit {
            language: language.to_string(),
            models,
            best_model,
        }))
    }
}

/// Degree with the strictly greatest R²; near-ties go to the lower degree.
#[must_use]
pub fn select_best(models: &[PolynomialModel]) -> Option<ModelDegree> {
    let mut ordered: Vec<&PolynomialModel> = models.iter().collect();
    ordered.sort_by_key(|model| model.degree);

    let mut best = *ordered.first()?;
    for model in ordered.into_iter().skip(1) {
        if model.r_squared > best.r_squared + R_SQUARED_TIE_TOLERANCE {
            best = model;
        }
    }
    Some(best.degree)
}
