use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use oncoscrape::config::{self, ScrapeConfig};
use oncoscrape::ocr::OcrmypdfEngine;

/// Scrape structured clinical and genomic fields out of OCR'd oncology
/// panel reports into one CSV table.
#[derive(Parser)]
#[command(name = "oncoscrape", version, about)]
struct Cli {
    /// Directory of PDF reports to scan.
    #[arg(long)]
    reports: Option<PathBuf>,

    /// JSON config overriding the built-in report layout defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Gene roster file (whitespace- or comma-delimited names).
    #[arg(long)]
    genes: Option<PathBuf>,

    /// Output CSV path.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Sidecar text cache directory (default: <reports>/text-files).
    #[arg(long)]
    text_dir: Option<PathBuf>,

    /// OCR executable to invoke for uncached reports.
    #[arg(long, default_value = "ocrmypdf")]
    ocr_program: String,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} v{} starting", config::APP_NAME, config::APP_VERSION);

    let cli = Cli::parse();
    let mut scrape_config = match &cli.config {
        Some(path) => match ScrapeConfig::from_file(path) {
            Ok(loaded) => loaded,
            Err(err) => {
                tracing::error!(error = %err, "cannot load config");
                return ExitCode::FAILURE;
            }
        },
        None => ScrapeConfig::default(),
    };
    if let Some(reports) = cli.reports {
        scrape_config.report_dir = reports;
    }
    if let Some(genes) = cli.genes {
        scrape_config.roster_path = genes;
    }
    if let Some(output) = cli.output {
        scrape_config.output_path = output;
    }
    if let Some(text_dir) = cli.text_dir {
        scrape_config.text_dir = Some(text_dir);
    }

    let engine = OcrmypdfEngine::with_program(&cli.ocr_program);
    match oncoscrape::run(&scrape_config, &engine) {
        Ok(summary) => {
            tracing::info!(
                scraped = summary.scraped,
                cache_hits = summary.cache_hits,
                failed = summary.failed,
                "run complete"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "run failed");
            ExitCode::FAILURE
        }
    }
}
