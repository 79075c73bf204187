use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use avocado_ols::config::PipelineConfig;
use avocado_ols::data::loader::load_csv;
use avocado_ols::pipeline;
use avocado_ols::regression::Solver;
use avocado_ols::report;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Fit the regression and print the coefficients and R^2
    Fit(FitArg),
    /// Print the distinct values of a column with their counts
    Levels(LevelsArg),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Args)]
struct FitArg {
    /// CSV file with a header row
    csv: PathBuf,
    /// JSON configuration; omitted fields keep the avocado defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Least-squares solver (overrides the config file)
    #[arg(long, value_enum)]
    solver: Option<Solver>,
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
    /// Decimal places in the text report (overrides the config file)
    #[arg(long)]
    precision: Option<usize>,
}

#[derive(Debug, Clone, Args)]
struct LevelsArg {
    csv: PathBuf,
    column: String,
}

pub fn run() -> Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Fit(arg) => run_fit(&arg),
        Mode::Levels(arg) => run_levels(&arg),
    }
}

fn fit_config(arg: &FitArg) -> Result<PipelineConfig> {
    let mut config = match &arg.config {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(solver) = arg.solver {
        config.solver = solver;
    }
    if let Some(precision) = arg.precision {
        config.precision = precision;
    }
    Ok(config)
}

fn run_fit(arg: &FitArg) -> Result<()> {
    let config = fit_config(arg)?;
    log::debug!("Config: {config:?}");

    let result = pipeline::run(&arg.csv, &config)
        .with_context(|| format!("fitting {}", arg.csv.display()))?;

    let mut out = io::stdout().lock();
    match arg.format {
        OutputFormat::Text => report::write_text(&mut out, &result, config.precision)?,
        OutputFormat::Json => report::write_json(&mut out, &result)?,
    }
    Ok(())
}

fn run_levels(arg: &LevelsArg) -> Result<()> {
    let table = load_csv(&arg.csv).with_context(|| format!("reading {}", arg.csv.display()))?;
    let counts = table.value_counts(&arg.column)?;
    write_levels(&mut io::stdout().lock(), &counts)?;
    Ok(())
}

fn write_levels<W: Write>(out: &mut W, counts: &BTreeMap<String, usize>) -> io::Result<()> {
    let width = counts.keys().map(String::len).max().unwrap_or(0);
    for (value, count) in counts {
        writeln!(out, "{value:<width$}  {count}")?;
    }
    Ok(())
}
