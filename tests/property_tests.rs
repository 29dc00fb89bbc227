//! Property-based tests for matbench
//!
//! - Derived statistics stay consistent with their samples
//! - Relative performance is anchored at 1.0 for every matrix size
//! - Summary ordering and model selection invariants hold
//! - Run with `ProptestConfig::with_cases(100)`

use std::io::Cursor;

use matbench::aggregate;
use matbench::complexity::{select_best, ModelDegree, PolynomialModel, R_SQUARED_TIE_TOLERANCE};
use matbench::ingest::{parse_times, SourceTable};
use matbench::metrics;
use matbench::record::{AverageSource, RawRecord, RecordStore};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn arb_times() -> impl Strategy<Value = Vec<f64>> {
    proptest::collection::vec(1e-6f64..100.0, 1..20)
}

fn arb_language() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["C", "C++", "Go", "Java", "Python", "Rust"]).prop_map(String::from)
}

/// Records over a small size grid so several languages share sizes.
fn arb_records() -> impl Strategy<Value = Vec<RawRecord>> {
    proptest::collection::vec(
        (
            arb_language(),
            prop::sample::select(vec![64u32, 128, 256, 512]),
            arb_times(),
        ),
        1..30,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .map(|(language, size, times)| RawRecord::new(language, size, times))
            .collect()
    })
}

fn arb_models() -> impl Strategy<Value = Vec<PolynomialModel>> {
    (0.0f64..=1.0, 0.0f64..=1.0, 0.0f64..=1.0).prop_map(|(l, q, c)| {
        ModelDegree::ALL
            .iter()
            .zip([l, q, c])
            .map(|(&degree, r_squared)| PolynomialModel {
                degree,
                coefficients: vec![0.0; degree.degree() + 1],
                r_squared,
            })
            .collect()
    })
}

fn store(records: Vec<RawRecord>) -> RecordStore {
    records.into_iter().map(metrics::derive).collect()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: derived average lies between min and max and std dev is non-negative
    #[test]
    fn prop_derived_statistics_bound_samples(times in arb_times()) {
        let record = metrics::derive(RawRecord::new("Rust", 100, times.clone()));

        let tolerance = record.max_time() * 1e-12;
        prop_assert_eq!(record.average_source(), AverageSource::Derived);
        prop_assert!(record.min_time() <= record.average_time() + tolerance);
        prop_assert!(record.average_time() <= record.max_time() + tolerance);
        prop_assert!(record.std_dev() >= 0.0);
        prop_assert_eq!(record.iterations() as usize, times.len());
        prop_assert_eq!(record.individual_times(), times.as_slice());
    }

    /// Property: every matrix size has a 1.0 anchor and nothing below it
    #[test]
    fn prop_relative_performance_anchored(records in arb_records()) {
        let mut store = store(records);
        let aggregation = aggregate::aggregate(&mut store);

        for (&size, &fastest) in aggregation.fastest_by_size() {
            let ratios: Vec<f64> = store
                .iter()
                .filter(|r| r.matrix_size() == size)
                .map(|r| r.relative_performance().unwrap())
                .collect();
            prop_assert!(ratios.iter().all(|&ratio| ratio >= 1.0));
            prop_assert!(ratios.iter().any(|&ratio| ratio == 1.0));
            prop_assert!(store
                .iter()
                .filter(|r| r.matrix_size() == size)
                .all(|r| r.fastest_time() == Some(fastest)));
        }
    }

    /// Property: summary ascends by size, then average, with ranks starting at 1
    #[test]
    fn prop_summary_is_ordered(records in arb_records()) {
        let mut store = store(records);
        let aggregation = aggregate::aggregate(&mut store);
        let summary = aggregation.summary();

        for pair in summary.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(a.matrix_size <= b.matrix_size);
            if a.matrix_size == b.matrix_size {
                prop_assert!(a.average_time <= b.average_time);
                prop_assert!(a.rank <= b.rank);
            }
        }
        for ranking in aggregation.rankings() {
            prop_assert_eq!(ranking.rows()[0].rank, 1);
            prop_assert!(!ranking.fastest().is_empty());
        }
    }

    /// Property: the selected model is never beaten by more than the tie tolerance
    #[test]
    fn prop_best_model_dominates(models in arb_models()) {
        let best = select_best(&models).unwrap();
        let best_r2 = models.iter().find(|m| m.degree == best).unwrap().r_squared;

        for model in &models {
            prop_assert!(model.r_squared <= best_r2 + R_SQUARED_TIE_TOLERANCE);
            // Simpler models only lose on a strictly better score
            if model.degree < best {
                prop_assert!(best_r2 > model.r_squared);
            }
        }
    }

    /// Property: formatted timings parse back to the same values
    #[test]
    fn prop_timings_parse_back(times in arb_times()) {
        let field = times
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        prop_assert_eq!(parse_times(&field).unwrap(), times);
    }

    /// Property: a row whose sample count disagrees with iterations is rejected
    #[test]
    fn prop_iteration_mismatch_rejected(times in arb_times(), extra in 1u32..5) {
        let iterations = u32::try_from(times.len()).unwrap() + extra;
        let field = times
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        let csv = format!(
            "language,matrix_size,iterations,individual_times\nGo,100,{iterations},{field}\n"
        );
        let source = SourceTable::from_reader("benchmark_go_results.csv", Cursor::new(csv));
        prop_assert!(source.parse().is_err());
    }
}
