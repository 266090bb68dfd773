//! kmprint command-line tool
//!
//! Reads a JSON dump of decoded classes, prints the Kotlin metadata of each
//! selected class as source-like declarations and writes the result as text
//! or as a JSON report.

mod config;
mod filter;
mod output;
mod report;

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use kmprint_engine::{ArtifactStore, CompanionEmission, Printer};
use kmprint_model::ClassEntry;

use crate::filter::ClassFilter;
use crate::output::{ColorMode, StyledOutput};

#[derive(Parser)]
#[command(name = "kmprint")]
#[command(about = "Print Kotlin metadata as human-readable declarations", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON dump of decoded classes
    input: PathBuf,

    /// Class name filter, e.g. `!**Test,com.example.**`
    #[arg(long)]
    filter: Option<String>,

    /// Write output to this file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Output a JSON report
    #[arg(long)]
    json: bool,

    /// Text printed between two artifacts
    #[arg(long)]
    divider: Option<String>,

    /// Worker threads (0 = one per CPU)
    #[arg(long)]
    threads: Option<usize>,

    /// Also give synthetic classes and multi-file parts their own artifact
    #[arg(long)]
    include_embedded: bool,

    /// Emit a companion object once, whatever the metadata version
    #[arg(long)]
    single_companion: bool,

    /// Color of status output
    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    color: ColorMode,

    /// Verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let mut out = StyledOutput::new(cli.color.resolve());
    match run(&cli, &mut out) {
        Ok(code) => code,
        Err(err) => {
            out.fatal(&format!("Failed printing Kotlin metadata: {:#}", err));
            ExitCode::from(2)
        }
    }
}

fn run(cli: &Cli, out: &mut StyledOutput) -> Result<ExitCode> {
    let settings = config::load()?;
    let mut printer_config = settings.printer;
    if let Some(threads) = cli.threads {
        printer_config.threads = threads;
    }
    if cli.include_embedded {
        printer_config.exclude_embedded = false;
    }
    if cli.single_companion {
        printer_config.companion_emission = CompanionEmission::Single;
    }
    let divider = cli
        .divider
        .clone()
        .or(settings.output.divider)
        .unwrap_or_else(|| report::DEFAULT_DIVIDER.to_string());
    debug!(?printer_config, "configuration");

    let text = fs::read_to_string(&cli.input)
        .with_context(|| format!("Failed to read {}", cli.input.display()))?;
    let classes: Vec<ClassEntry> = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse class dump {}", cli.input.display()))?;
    info!(classes = classes.len(), input = %cli.input.display(), "loaded class dump");

    let filter = match &cli.filter {
        Some(patterns) => ClassFilter::parse(patterns)?,
        None => ClassFilter::any(),
    };

    let printer = Printer::new(printer_config);
    let mut store = ArtifactStore::new();
    let report = printer.print_selected(&classes, &mut store, |entry| filter.matches(&entry.name));

    let mut sink: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(
            fs::File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    if cli.json {
        let input_name = cli
            .input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let value = report::json_report(&input_name, &classes, &report, &store);
        let json = serde_json::to_string_pretty(&value).context("Failed to serialize JSON")?;
        writeln!(sink, "{}", json)?;
    } else {
        report::write_text(&mut sink, &store, &divider)?;
    }
    sink.flush()?;
    drop(sink);

    if !cli.json {
        if let Some(notice) = report::empty_notice(&report.statistics) {
            out.notice(&notice);
        }
    }

    for (class, err) in &report.failed {
        out.class_failure(class, err);
    }
    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}
