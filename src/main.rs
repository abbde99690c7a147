//! sheet-analyzer CLI.
//!
//! Loads a spreadsheet, lists its columns or analyses one of them, prints
//! the derived tables and optionally saves them to a workbook.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use sheet_analyzer::{AnalysisProfile, AnalyzerError, Session, render};

const CHART_WIDTH: usize = 40;

/// Frequency tables, grouped statistics and trends for a spreadsheet column.
#[derive(Parser)]
#[command(name = "sheet-analyzer", version, about)]
struct Cli {
    /// Spreadsheet (.xlsx, .xls, .ods) or CSV file to analyse.
    file: PathBuf,

    /// Column to analyse. Lists the available columns when omitted.
    #[arg(short, long)]
    column: Option<String>,

    /// TOML profile with column names and labels.
    #[arg(long, conflicts_with = "preset")]
    profile: Option<PathBuf>,

    /// Built-in profile (generic, environmental).
    #[arg(long, default_value = "generic")]
    preset: String,

    /// Numeric column summarised per group (overrides the profile).
    #[arg(long)]
    measure: Option<String>,

    /// Period column for the trend table (overrides the profile).
    #[arg(long)]
    period: Option<String>,

    /// Workbook sheet to read (overrides the profile).
    #[arg(long)]
    sheet: Option<String>,

    /// Save the tables to this .xlsx or .csv file.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Draw a bar chart of the absolute frequencies.
    #[arg(long)]
    chart: bool,

    /// Enable debug logging on stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so tables on stdout stay clean. `RUST_LOG` wins unless
/// `--verbose` is given.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_profile(cli: &Cli) -> Result<AnalysisProfile, AnalyzerError> {
    let mut profile = match &cli.profile {
        Some(path) => AnalysisProfile::from_file(path)?,
        None => AnalysisProfile::preset(&cli.preset)
            .ok_or_else(|| AnalyzerError::Config(format!("unknown preset {:?}", cli.preset)))?,
    };

    if let Some(measure) = &cli.measure {
        profile.measure = Some(measure.clone());
    }
    if let Some(period) = &cli.period {
        profile.period = Some(period.clone());
    }
    if let Some(sheet) = &cli.sheet {
        profile.sheet = Some(sheet.clone());
    }

    debug!(?profile, "profile resolved");
    Ok(profile)
}

fn run(cli: Cli) -> Result<(), AnalyzerError> {
    let profile = resolve_profile(&cli)?;
    let decimals = profile.decimals;
    let labels = profile.labels.clone();

    let mut session = Session::new(profile);
    session.load(&cli.file)?;
    if let Some(dataset) = session.dataset() {
        debug!(rows = dataset.row_count(), columns = dataset.headers().len(), "dataset ready");
    }

    let Some(column) = cli.column.as_deref() else {
        for name in session.columns() {
            println!("{name}");
        }
        return Ok(());
    };

    let tables = session.select(column)?.tables(&labels);
    for table in &tables {
        println!("{}", table.name);
        println!("{}", render::table(table, decimals));
    }

    if cli.chart {
        if let Some(counts) = tables.first() {
            print!(
                "{}",
                render::bar_chart(counts, column, &labels.absolute, CHART_WIDTH, decimals)?
            );
        }
    }

    if let Some(output) = &cli.output {
        session.save(output)?;
        println!("Saved {}", output.display());
    }

    Ok(())
}
