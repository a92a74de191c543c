//! Command-line interface for the Parquet to JSON converter.

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, LevelFilter};
use parquet2json::{
    BatchConfig, BinaryEncoding, ConvertOptions, FailurePolicy, NonFinitePolicy, TemporalFormat,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Convert Parquet files to JSON arrays",
    long_about = "Reads each Parquet file fully into memory and writes a JSON array with one \
                  object per row into the output directory.\n\n\
                  Output names are derived from input names: a.parquet becomes <OUT_DIR>/a.json."
)]
struct Args {
    /// Parquet files to convert
    #[arg(value_name = "INPUT", required = true)]
    inputs: Vec<PathBuf>,

    /// Directory for the JSON files (created if missing)
    #[arg(short, long, value_name = "OUT_DIR")]
    out_dir: PathBuf,

    /// Keep converting remaining files after a failure
    #[arg(long)]
    keep_going: bool,

    /// NaN/Infinity handling: null or error
    #[arg(long, default_value = "null", value_name = "POLICY")]
    non_finite: NonFinitePolicy,

    /// Binary column encoding: base64, hex or reject
    #[arg(long, default_value = "base64", value_name = "ENCODING")]
    binary: BinaryEncoding,

    /// Date/timestamp rendering: epoch-millis or iso8601
    #[arg(long, default_value = "epoch-millis", value_name = "FORMAT")]
    temporal: TemporalFormat,

    /// Write a JSON summary of the run to this path
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,

    /// Log schema and a preview of every input
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

fn run(args: Args) -> Result<bool> {
    let options = ConvertOptions::new()
        .non_finite(args.non_finite)
        .binary(args.binary)
        .temporal(args.temporal);
    let policy = if args.keep_going {
        FailurePolicy::Continue
    } else {
        FailurePolicy::Abort
    };

    info!(
        "Converting {} file(s) into {}",
        args.inputs.len(),
        args.out_dir.display()
    );

    let start = Instant::now();
    let report = BatchConfig::new(args.inputs, &args.out_dir)
        .failure_policy(policy)
        .options(options)
        .run()?;

    for failed in &report.failures {
        error!("✗ {}: {}", failed.input.display(), failed.error);
    }
    info!("{} in {:.2?}", report.summary(), start.elapsed());

    if let Some(path) = &args.report {
        let file = File::create(path)
            .with_context(|| format!("cannot create report {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &report)
            .with_context(|| format!("cannot write report {}", path.display()))?;
    }

    Ok(report.is_success())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else if args.quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
