//! scagnostics-cli - scatterplot diagnostics for every column pair of a CSV
//!
//! Prints one JSON object per column pair on stdout. Logging goes to stderr
//! and is controlled with `RUST_LOG`.

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use scagnostics_core::{
    BinGrid, Metrics, PointCounts, ScagResult, ScagnosticsConfig, ScagnosticsEngine,
};
use scagnostics_table::{
    open_file, PairResult, PairwiseScagnostics, ScagnosticsInput, ScagnosticsOutput, Table,
};

#[derive(Parser, Debug)]
#[command(name = "scagnostics-cli")]
#[command(about = "Graph-theoretic scatterplot diagnostics for CSV column pairs")]
#[command(version)]
struct Args {
    /// Input CSV (or TSV) file with a header row
    csv: PathBuf,

    /// Keep outliers instead of peeling them before measuring
    #[arg(long)]
    keep_outliers: bool,

    /// TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Comma-separated columns to pair (default: every numeric column)
    #[arg(long, value_delimiter = ',')]
    columns: Option<Vec<String>>,

    /// Include the density grid in each output object
    #[arg(long)]
    bins: bool,

    /// Evaluate pairs on the rayon pool
    #[arg(long)]
    parallel: bool,
}

/// One output line
#[derive(Serialize)]
struct PairLine<'a> {
    x: &'a str,
    y: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    metrics: Option<&'a Metrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    counts: Option<&'a PointCounts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bins: Option<&'a BinGrid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(io::stderr))
        .init();
}

fn load_config(args: &Args) -> Result<ScagnosticsConfig, Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => {
            let contents = std::fs::read_to_string(path)?;
            ScagnosticsConfig::from_toml(&contents)?
        }
        None => ScagnosticsConfig::default(),
    };
    if args.keep_outliers {
        return Ok(config.with_remove_outliers(false));
    }
    Ok(config)
}

fn load_table(args: &Args) -> Result<Table, Box<dyn std::error::Error>> {
    let path = args.csv.to_str().ok_or("input path is not valid UTF-8")?;
    let reader = open_file(path)?;
    let table = reader.read_table()?;
    info!(
        columns = table.num_columns(),
        rows = table.num_rows(),
        "loaded table"
    );

    match &args.columns {
        Some(names) => Ok(table.select(names)?),
        None => Ok(table.numeric_only()),
    }
}

/// Column name pairs in the order the pairwise driver yields them
fn pair_names(names: &[String]) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (i, x) in names.iter().enumerate() {
        for y in &names[i + 1..] {
            pairs.push((x.clone(), y.clone()));
        }
    }
    pairs
}

fn evaluate(pairs: PairwiseScagnostics, parallel: bool) -> Vec<ScagResult<PairResult>> {
    if parallel {
        pairs.compute_all()
    } else {
        pairs.collect()
    }
}

fn write_line<W: Write>(
    out: &mut W,
    (x, y): &(String, String),
    result: &ScagResult<PairResult>,
    include_bins: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let line = match result {
        Ok(pair) => PairLine {
            x,
            y,
            metrics: Some(&pair.result.metrics),
            counts: Some(&pair.result.counts),
            bins: include_bins.then_some(&pair.result.bins),
            error: None,
        },
        Err(err) => {
            warn!(x = x.as_str(), y = y.as_str(), error = %err, "pair failed");
            PairLine {
                x,
                y,
                metrics: None,
                counts: None,
                bins: None,
                error: Some(err.to_string()),
            }
        }
    };
    serde_json::to_writer(&mut *out, &line)?;
    writeln!(out)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let args = Args::parse();

    let engine = ScagnosticsEngine::new(load_config(&args)?)?;
    let table = load_table(&args)?;

    let ScagnosticsOutput::Pairwise(pairs) = ScagnosticsInput::Table(table).evaluate(&engine)?
    else {
        return Err("table input produced a single result".into());
    };

    let names = pair_names(pairs.column_names());
    info!(pairs = names.len(), parallel = args.parallel, "computing scagnostics");

    let results = evaluate(pairs, args.parallel);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for (pair, result) in names.iter().zip(&results) {
        write_line(&mut out, pair, result, args.bins)?;
    }
    out.flush()?;

    Ok(())
}
