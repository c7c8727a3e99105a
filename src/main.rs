//! Command line interface for the enrichment factor analysis

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use efa::parser::{read_events, read_results};
use efa::{ef_analysis, AnalysisConfig, EfaResult};

#[derive(Parser)]
#[command(name = "efa")]
#[command(about = "Compute enrichment factors and q-values")]
#[command(version)]
struct Cli {
    /// Events file mapping molecules to events
    events: PathBuf,

    /// Results file mapping molecules to predicted targets
    results: PathBuf,

    /// Output CSV file
    output: PathBuf,

    /// Minimum pairs cutoff for EF analysis
    #[arg(short, long, default_value_t = efa::config::DEFAULT_MIN_PAIRS)]
    min_pairs: u64,

    /// Enrichment factor cutoff above which we write results
    #[arg(short, long, default_value_t = efa::config::DEFAULT_EF_CUTOFF)]
    ef_cutoff: f64,

    /// Q-value cutoff below which we write results
    #[arg(short, long, default_value_t = efa::config::DEFAULT_QVALUE_CUTOFF)]
    qvalue_cutoff: f64,

    /// Use Bonferroni q-value correction (saves memory at high EF
    /// cutoffs while still yielding stable q-values)
    #[arg(short, long)]
    bonferroni: bool,
}

impl Cli {
    fn config(&self) -> AnalysisConfig {
        AnalysisConfig {
            min_pairs: self.min_pairs,
            ef_cutoff: self.ef_cutoff,
            qvalue_cutoff: self.qvalue_cutoff,
            bonferroni: self.bonferroni,
        }
    }
}

/// Companion log file: `.csv` replaced by `.log`, appended otherwise
fn log_path(output: &Path) -> PathBuf {
    if output.extension().is_some_and(|ext| ext == "csv") {
        output.with_extension("log")
    } else {
        let mut path = output.as_os_str().to_owned();
        path.push(".log");
        PathBuf::from(path)
    }
}

fn run(cli: &Cli) -> EfaResult<usize> {
    info!("Events file: {}", cli.events.display());
    let events = read_events(File::open(&cli.events)?)?;

    info!("Results file: {}", cli.results.display());
    let results = read_results(File::open(&cli.results)?)?;

    info!("Output file: {}", cli.output.display());
    let out = File::create(&cli.output)?;

    ef_analysis(&events, &results, &cli.config(), out)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_file = match File::create(log_path(&cli.output)) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("unable to create log file: {err}");
            return ExitCode::FAILURE;
        }
    };
    tracing_subscriber::registry()
        .with(
            EnvFilter::builder()
                .with_default_directive(tracing::level_filters::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Arc::new(log_file)),
        )
        .init();

    match run(&cli) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
