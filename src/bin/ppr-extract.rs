use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use ppr_tables::{
    ExtractOptions, Extraction, GridChoice, PageSelection, ReportId, RowWhitelists,
    default_registry, document_to_csv_string, document_to_json, extract_pdf, next_report,
    report_page_url, write_document_csv,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "ppr-extract",
    version,
    about = "Extract the numeric tables of the monetary policy report"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract tables 2a-2d and 3 from a report PDF.
    Extract(ExtractArgs),
    /// Show the next expected report.
    Next(NextArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GridArg {
    First,
    MostRows,
}

impl From<GridArg> for GridChoice {
    fn from(value: GridArg) -> Self {
        match value {
            GridArg::First => Self::First,
            GridArg::MostRows => Self::MostRows,
        }
    }
}

#[derive(Debug, Args)]
struct ExtractArgs {
    /// Input PDF path.
    #[arg(short, long)]
    input: PathBuf,

    /// Output path; stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Report being read, like 4/25. Selects Faktisk and the projection rows.
    #[arg(long)]
    report: Option<String>,

    /// Extra row label to keep in tables 2a-2d. Repeatable.
    #[arg(long = "row-label")]
    row_labels: Vec<String>,

    /// Page selection like 1-3,5.
    #[arg(long)]
    pages: Option<String>,

    #[arg(long, value_enum, default_value = "first")]
    grid: GridArg,

    /// CSV delimiter character.
    #[arg(long, default_value = ",")]
    delimiter: char,

    /// Print every warning and log progress.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Args)]
struct NextArgs {
    /// Date to count from (YYYY-MM-DD); today when omitted.
    #[arg(long)]
    date: Option<NaiveDate>,
}

fn parse_whitelists(args: &ExtractArgs) -> Result<RowWhitelists> {
    let mut whitelists = match args.report.as_deref() {
        Some(value) => ReportId::from_str(value)
            .map(RowWhitelists::for_report)
            .with_context(|| format!("failed to parse --report '{value}'"))?,
        None => RowWhitelists::default(),
    };
    for label in &args.row_labels {
        whitelists.insert(label.trim());
    }

    if whitelists == RowWhitelists::default() {
        anyhow::bail!("no row labels to select; pass --report or --row-label");
    }
    Ok(whitelists)
}

fn parse_options(args: &ExtractArgs) -> Result<ExtractOptions> {
    let pages = args
        .pages
        .as_deref()
        .map(PageSelection::from_str)
        .transpose()
        .context("failed to parse --pages")?;

    if !args.delimiter.is_ascii() {
        anyhow::bail!("delimiter must be a single ASCII character");
    }

    Ok(ExtractOptions {
        pages,
        grid_choice: args.grid.into(),
    })
}

fn log_report(extraction: &Extraction, verbose: bool) {
    for location in &extraction.report.located {
        eprintln!(
            "table {}: page index {}, {} row(s)",
            location.table_id, location.page_index, location.row_count
        );
    }

    if extraction.report.warnings.is_empty() {
        return;
    }

    eprintln!("warning: {} issue(s) detected", extraction.report.warnings.len());
    if verbose {
        for warning in &extraction.report.warnings {
            eprintln!(
                "  - {:?} page_index={:?} table_id={:?}: {}",
                warning.code,
                warning.page_index,
                warning.table_id.map(|id| id.to_string()),
                warning.message
            );
        }
    }
}

fn write_output(args: &ExtractArgs, extraction: &Extraction) -> Result<()> {
    let delimiter = u8::try_from(args.delimiter)
        .map_err(|_| anyhow!("delimiter must be a single ASCII character"))?;

    match (args.format, args.output.as_ref()) {
        (OutputFormat::Csv, Some(path)) => write_document_csv(path, &extraction.document, delimiter)
            .with_context(|| format!("failed to write '{}'", path.display())),
        (OutputFormat::Csv, None) => {
            print!("{}", document_to_csv_string(&extraction.document, delimiter)?);
            Ok(())
        }
        (OutputFormat::Json, Some(path)) => {
            let json = document_to_json(&extraction.document)?;
            std::fs::write(path, json + "\n")
                .with_context(|| format!("failed to write '{}'", path.display()))
        }
        (OutputFormat::Json, None) => {
            println!("{}", document_to_json(&extraction.document)?);
            Ok(())
        }
    }
}

fn run_extract(args: &ExtractArgs) -> Result<Extraction> {
    let options = parse_options(args)?;
    let whitelists = parse_whitelists(args)?;
    let extraction = extract_pdf(&args.input, &default_registry(), &whitelists, &options)
        .with_context(|| format!("failed to extract tables from '{}'", args.input.display()))?;
    write_output(args, &extraction)?;
    Ok(extraction)
}

fn run_next(args: &NextArgs) {
    let today = args.date.unwrap_or_else(|| Local::now().date_naive());
    let (report, date) = next_report(today);
    let days = (date - today).num_days();
    println!("next report: {report}");
    println!("expected: {date} ({days} day(s) from {today})");
    println!("page: {}", report_page_url(report));
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = matches!(&cli.command, Commands::Extract(args) if args.verbose);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "ppr_tables=info" } else { "ppr_tables=warn" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    match cli.command {
        Commands::Extract(args) => match run_extract(&args) {
            Ok(extraction) => {
                log_report(&extraction, args.verbose);
                if extraction.document.is_empty() {
                    ExitCode::from(2)
                } else {
                    ExitCode::SUCCESS
                }
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                ExitCode::from(1)
            }
        },
        Commands::Next(args) => {
            run_next(&args);
            ExitCode::SUCCESS
        }
    }
}
