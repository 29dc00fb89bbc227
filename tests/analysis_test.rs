//! Aggregation and complexity classification on synthetic data

use std::io::Cursor;

use approx::assert_relative_eq;
use matbench::complexity::{ComplexityClassifier, ModelDegree, SkipReason};
use matbench::config::AnalysisConfig;
use matbench::ingest::SourceTable;
use matbench::metrics;
use matbench::pipeline::Pipeline;
use matbench::record::{RawRecord, RecordStore};
use matbench::{aggregate, Error};

fn store(records: Vec<RawRecord>) -> RecordStore {
    records.into_iter().map(metrics::derive).collect()
}

fn series(language: &str, sizes: &[u32], f: impl Fn(f64) -> f64) -> Vec<RawRecord> {
    sizes
        .iter()
        .map(|&n| RawRecord::new(language, n, vec![f(f64::from(n))]))
        .collect()
}

#[test]
fn test_cubic_series_selects_cubic() {
    let store = store(series("C", &[10, 20, 30, 40], |n| 5e-9 * n.powi(3)));
    let classification = ComplexityClassifier::default().classify(&store);

    let fit = classification.fit_for("C").unwrap();
    assert_eq!(fit.best_model(), ModelDegree::Cubic);
    assert_relative_eq!(fit.r_squared(), 1.0, epsilon = 1e-9);

    let linear = fit.model(ModelDegree::Linear).unwrap();
    let quadratic = fit.model(ModelDegree::Quadratic).unwrap();
    assert!(linear.r_squared < quadratic.r_squared);
    assert!(quadratic.r_squared < fit.r_squared());
    // x = 1..4 scaled: linear explains 2163.2 of 2390
    assert_relative_eq!(linear.r_squared, 2163.2 / 2390.0, epsilon = 1e-9);
}

#[test]
fn test_quadratic_series_selects_quadratic() {
    let store = store(series("Java", &[100, 200, 300, 400, 500], |n| 1e-6 * n * n + 0.01));
    let classification = ComplexityClassifier::default().classify(&store);
    let fit = classification.fit_for("Java").unwrap();

    // Cubic matches just as well; the simpler model wins the tie
    assert_eq!(fit.best_model(), ModelDegree::Quadratic);
    assert_eq!(fit.coefficients().len(), 3);
    assert_relative_eq!(fit.coefficients()[0], 1e-6, max_relative = 1e-6);
}

#[test]
fn test_exactly_three_sizes_still_classified() {
    let store = store(series("Kotlin", &[100, 200, 300], |n| 2e-9 * n.powi(3)));
    let classification = ComplexityClassifier::default().classify(&store);
    let fit = classification.fit_for("Kotlin").unwrap();

    // Quadratic already interpolates three points exactly
    assert_eq!(fit.best_model(), ModelDegree::Quadratic);
    assert_eq!(fit.models().len(), 3);
}

#[test]
fn test_failures_are_isolated_per_language() {
    let mut records = series("Flat", &[100, 200, 300], |_| 0.5);
    records.extend(series("Pair", &[100, 200], |n| n * 1e-3));
    records.extend(series("Rust", &[100, 200, 300, 400], |n| 1e-9 * n.powi(3)));
    let store = store(records);

    let classification = ComplexityClassifier::default().classify(&store);

    assert_eq!(classification.fits.len(), 1);
    assert_eq!(classification.fits[0].language(), "Rust");
    assert_eq!(classification.skipped.len(), 2);
    assert_eq!(classification.skipped[0].language, "Flat");
    assert_eq!(classification.skipped[0].reason, SkipReason::Degenerate);
    assert_eq!(classification.skipped[1].language, "Pair");
    assert!(matches!(
        classification.skipped[1].reason,
        SkipReason::InsufficientSizes { distinct: 2, .. }
    ));
}

#[test]
fn test_numerical_failure_is_isolated_per_language() {
    // Squared residuals overflow, so R² cannot be computed
    let mut records = series("Huge", &[100, 200, 300, 400], |n| 1e200 * n.powi(3));
    records.extend(series("Rust", &[100, 200, 300, 400], |n| 1e-9 * n.powi(3)));
    let store = store(records);

    let classification = ComplexityClassifier::default().classify(&store);

    assert_eq!(classification.fits.len(), 1);
    assert_eq!(classification.fits[0].language(), "Rust");
    assert_eq!(classification.fits[0].best_model(), ModelDegree::Cubic);
    assert_eq!(classification.skipped.len(), 1);
    assert_eq!(classification.skipped[0].language, "Huge");
    assert!(matches!(
        classification.skipped[0].reason,
        SkipReason::Numerical { .. }
    ));
}

#[test]
fn test_numerical_failure_reports_error() {
    let classifier = ComplexityClassifier::default();
    let points: Vec<(f64, f64)> = [100.0, 200.0, 300.0]
        .iter()
        .map(|&n: &f64| (n, 1e200 * n.powi(3)))
        .collect();
    let err = classifier.classify_language("Huge", &points).unwrap_err();
    assert!(matches!(err, Error::FitNumerical { ref language, .. } if language == "Huge"));
    assert!(!err.is_fatal());
}

#[test]
fn test_degenerate_language_reports_error() {
    let classifier = ComplexityClassifier::default();
    let points = [(100.0, 1.0), (200.0, 1.0), (300.0, 1.0), (400.0, 1.0)];
    let err = classifier.classify_language("Flat", &points).unwrap_err();
    assert!(matches!(err, Error::DegenerateFit { .. }));
    assert!(err.to_string().contains("Flat"));
}

#[test]
fn test_min_distinct_sizes_is_configurable() {
    let store = store(series("Go", &[100, 200, 300], |n| n * 1e-3));
    let classification = ComplexityClassifier::new(4).classify(&store);
    assert!(classification.fits.is_empty());
    assert_eq!(
        classification.skipped[0].reason,
        SkipReason::InsufficientSizes {
            distinct: 3,
            required: 4
        }
    );
}

#[test]
fn test_identical_averages_share_first_place() {
    let mut store = store(vec![
        RawRecord::new("Go", 500, vec![1.0, 1.5]),
        RawRecord::new("C#", 500, vec![1.25, 1.25]),
        RawRecord::new("Python", 500, vec![40.0, 42.0]),
    ]);
    let aggregation = aggregate::aggregate(&mut store);

    for language in ["Go", "C#"] {
        let record = &store.records_for(language)[0];
        assert_eq!(record.relative_performance(), Some(1.0));
    }

    let ranking = aggregation.ranking_for(500).unwrap();
    assert_eq!(ranking.fastest().len(), 2);
    assert_eq!(ranking.position("Go"), ranking.position("C#"));
    assert_eq!(ranking.position("Python"), Some(3));
}

#[test]
fn test_relative_performance_floor_per_size() {
    let mut store = store(vec![
        RawRecord::new("A", 100, vec![0.3]),
        RawRecord::new("B", 100, vec![0.1]),
        RawRecord::new("A", 200, vec![0.5]),
        RawRecord::new("B", 200, vec![0.9]),
    ]);
    let aggregation = aggregate::aggregate(&mut store);

    for size in [100, 200] {
        let at_size: Vec<f64> = store
            .iter()
            .filter(|r| r.matrix_size() == size)
            .map(|r| r.relative_performance().unwrap())
            .collect();
        assert!(at_size.iter().any(|&ratio| ratio == 1.0));
        assert!(at_size.iter().all(|&ratio| ratio >= 1.0));
    }
    assert_eq!(aggregation.fastest_by_size().len(), 2);
}

#[test]
fn test_reported_average_is_preserved_through_pipeline() {
    let csv = "language,matrix_size,iterations,individual_times,average_time\n\
               Python,100,2,1.0 1.0,9.5\n";
    let source = SourceTable::from_reader("benchmark_python_results.csv", Cursor::new(csv));
    let analysis = Pipeline::new(AnalysisConfig::default())
        .analyze_sources([source])
        .unwrap();

    let record = &analysis.store.records_for("Python")[0];
    assert_eq!(record.average_time(), 9.5);
    assert_relative_eq!(record.std_dev(), 0.0);
    assert_eq!(analysis.aggregation.summary()[0].average_time, 9.5);
}
