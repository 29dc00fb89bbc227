//! Human-readable ranking report

use std::fmt::Write;

use crate::aggregate::Aggregation;
use crate::complexity::Classification;

const RULE_WIDTH: usize = 60;

/// Render the ranking narrative: one section per matrix size.
///
/// Each section names the fastest language (all of them on a tie) and lists
/// the full ranking in fixed-width columns. A short complexity section
/// follows when any language was classified.
#[must_use]
pub fn render(aggregation: &Aggregation, classification: &Classification) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = write_report(&mut out, aggregation, classification);
    out
}

fn write_report(
    out: &mut String,
    aggregation: &Aggregation,
    classification: &Classification,
) -> std::fmt::Result {
    writeln!(out, "MATRIX MULTIPLICATION BENCHMARK REPORT")?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out)?;

    for ranking in aggregation.rankings() {
        let size = ranking.matrix_size();
        writeln!(out, "MATRICES OF SIZE {size}x{size}")?;
        writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;

        let fastest = ranking.fastest();
        if let Some(first) = fastest.first() {
            let names: Vec<&str> = fastest.iter().map(|row| row.language.as_str()).collect();
            let label = if names.len() > 1 { "Fastest languages" } else { "Fastest language" };
            writeln!(
                out,
                "{label}: {} (average time: {:.6} seconds)",
                names.join(", "),
                first.average_time
            )?;
        }
        writeln!(out)?;

        writeln!(out, "Performance ranking:")?;
        writeln!(
            out,
            "{:<10}{:<15}{:<15}{:<15}{:<15}{:<15}{:<15}",
            "Position", "Language", "Avg Time", "Min Time", "Max Time", "Std Dev", "Relative"
        )?;
        for row in ranking.rows() {
            let relative = format!("{:.2}x", row.relative_performance);
            writeln!(
                out,
                "{:<10}{:<15}{:<15.6}{:<15.6}{:<15.6}{:<15.6}{}",
                row.rank,
                row.language,
                row.average_time,
                row.min_time,
                row.max_time,
                row.std_dev,
                relative
            )?;
        }
        writeln!(out)?;
        writeln!(out)?;
    }

    if !classification.fits.is_empty() {
        writeln!(out, "COMPLEXITY ANALYSIS")?;
        writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
        writeln!(out, "{:<15}{:<12}{:<15}", "Language", "Best Model", "R²")?;
        for fit in &classification.fits {
            writeln!(
                out,
                "{:<15}{:<12}{:.6}",
                fit.language(),
                fit.best_model().name(),
                fit.r_squared()
            )?;
        }
    }

    Ok(())
}
