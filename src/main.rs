//! plugdeps - report which external plugins a set of Maya ASCII scenes requires.
//!
//! Usage:
//!   plugdeps <PATH>...                 Scan files/directories, print the text report
//!   plugdeps -f json <PATH>...         Print the report as JSON
//!   plugdeps -k -o deps.csv <PATH>...  Keep going past broken scenes, write to a file
//!   plugdeps --help                    Show help

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use plugdeps_core::{DEFAULT_EXTENSION, ErrorPolicy, ScanConfig, ScanError};
use plugdeps_report::{Report, ReportFormat, Reporter};
use plugdeps_scan::Scanner;

#[derive(Parser)]
#[command(
    name = "plugdeps",
    version,
    about = "Report which plugins a set of Maya ASCII scenes depends on",
    long_about = "plugdeps walks the given files and directories, reads every `requires` \
                  statement from each .ma scene, and prints, for every plugin, how many \
                  scenes reference it and which ones.\n\n\
                  Logs and skip notices go to stderr; the report goes to stdout."
)]
struct Cli {
    /// Scene files or directories to scan
    #[arg(required = true, value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Number of worker threads (0 = number of CPUs - 1)
    #[arg(short, long, default_value = "0")]
    jobs: usize,

    /// Scene file extension to look for
    #[arg(long, default_value = DEFAULT_EXTENSION)]
    ext: String,

    /// Skip scenes that fail to parse instead of aborting (exit status is still non-zero)
    #[arg(short = 'k', long)]
    keep_going: bool,

    /// Follow symbolic links to directories
    #[arg(long)]
    follow_symlinks: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log every file checked
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,

    /// Wait for Enter after printing the report
    #[arg(long)]
    pause: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => ReportFormat::Text,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    let error_policy = if cli.keep_going {
        ErrorPolicy::Continue
    } else {
        ErrorPolicy::FailFast
    };

    let config = ScanConfig::builder()
        .roots(cli.paths)
        .workers(cli.jobs)
        .extension(cli.ext)
        .error_policy(error_policy)
        .follow_symlinks(cli.follow_symlinks)
        .build()
        .map_err(ScanError::from)?;

    let outcome = Scanner::new().scan(&config).context("Scan failed")?;

    let failed = outcome.failures.len();
    let report = Report::from_state(&outcome.state).with_failures(outcome.failures);
    write_report(&report, cli.format.into(), cli.output.as_ref())?;

    if failed > 0 {
        eprintln!();
        eprintln!("{failed} scene(s) could not be read:");
        for failure in &report.failures {
            eprintln!("  {}: {}", failure.path.display(), failure.message);
        }
    }

    if cli.pause {
        wait_for_enter()?;
    }

    if failed > 0 {
        return Err(ScanError::PartialFailure { count: failed }.into());
    }
    Ok(())
}

/// Write the report to the output file, or stdout.
fn write_report(report: &Report, format: ReportFormat, output: Option<&PathBuf>) -> Result<()> {
    let reporter = Reporter::new(format);
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            reporter.write(report, BufWriter::new(file))?;
            info!("report written to {}", path.display());
        }
        None => {
            reporter.write(report, io::stdout().lock())?;
        }
    }
    Ok(())
}

/// Block until the user presses Enter.
fn wait_for_enter() -> Result<()> {
    eprintln!();
    eprintln!("Press 'Enter' to continue...");
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(())
}

fn setup_logging(verbose: bool, quiet: bool) {
    let default_filter = if verbose {
        "plugdeps=debug,plugdeps_scan=debug,warn"
    } else if quiet {
        "warn"
    } else {
        "plugdeps=info,plugdeps_scan=info,warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
