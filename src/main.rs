use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use matbench::config::{self, AnalysisConfig};
use matbench::pipeline::Pipeline;
use tracing_subscriber::EnvFilter;

/// Analyze cross-language matrix multiplication benchmark results
#[derive(Parser, Debug)]
#[command(name = "matbench", version, about)]
struct Cli {
    /// Directory holding benchmark_<language>_results.csv tables
    #[arg(short, long, default_value = config::DEFAULT_INPUT_DIR)]
    input: PathBuf,

    /// Directory the reports are written to
    #[arg(short, long, default_value = config::DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// Source file name prefix
    #[arg(long, default_value = config::DEFAULT_SOURCE_PREFIX)]
    prefix: String,

    /// Source file name suffix
    #[arg(long, default_value = config::DEFAULT_SOURCE_SUFFIX)]
    suffix: String,

    /// Distinct matrix sizes a language needs before its complexity is fitted
    #[arg(long, default_value_t = config::DEFAULT_MIN_DISTINCT_SIZES)]
    min_sizes: usize,

    /// Skip the Parquet copy of the combined table
    #[arg(long)]
    no_parquet: bool,

    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,
}

/// Initialize tracing subscriber; `RUST_LOG` overrides the default level
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = AnalysisConfig::builder()
        .input_dir(cli.input)
        .output_dir(cli.output)
        .source_prefix(cli.prefix)
        .source_suffix(cli.suffix)
        .min_distinct_sizes(cli.min_sizes)
        .write_parquet(!cli.no_parquet)
        .build()
        .context("invalid configuration")?;

    let pipeline = Pipeline::new(config);
    let analysis = pipeline.run().with_context(|| {
        format!(
            "analysis of {} failed",
            pipeline.config().input_dir().display()
        )
    })?;

    for ranking in analysis.aggregation.rankings() {
        let fastest: Vec<&str> = ranking
            .fastest()
            .iter()
            .map(|row| row.language.as_str())
            .collect();
        println!(
            "{size}x{size}: fastest {} of {} languages",
            fastest.join(", "),
            ranking.rows().len(),
            size = ranking.matrix_size()
        );
    }
    for fit in &analysis.classification.fits {
        println!(
            "{}: {} (R² = {:.4})",
            fit.language(),
            fit.best_model(),
            fit.r_squared()
        );
    }
    println!(
        "Results written to {}",
        pipeline.config().output_dir().display()
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
