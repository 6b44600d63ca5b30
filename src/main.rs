use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use thiserror::Error;
use tracing::info;

use competency_engine::EngineError;
use competency_engine::input::{InputError, load_dataset, load_profile, seed_store};
use competency_engine::report::build_report;
use competency_engine::report::json::render_report_json;
use competency_engine::report::text::render_report_text;
use competency_engine::scoring::ScoringProfile;

#[derive(Debug, Parser)]
#[command(
    name = "competency-engine",
    version,
    about = "Score competency assessments, team gaps and trends from a dataset snapshot"
)]
struct Cli {
    /// Log filter used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "info")]
    log: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Team radar, hiring gaps, individual summaries and trends.
    Report {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
        /// JSON file overriding scoring thresholds.
        #[arg(long)]
        profile: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("failed to render report: {0}")]
    Render(#[from] serde_json::Error),
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    competency_engine::tracing::init(&cli.log);
    if let Err(err) = run(cli.command).await {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

async fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Report {
            input,
            format,
            profile,
        } => {
            let profile = match profile {
                Some(path) => load_profile(&path)?,
                None => ScoringProfile::default_v1(),
            };
            let dataset = load_dataset(&input)?;
            let loaded = seed_store(dataset).await?;
            let report = build_report(&loaded, &profile).await?;
            info!(
                subjects = report.subjects.len(),
                gaps = report.hiring_gaps.len(),
                "report built"
            );

            let rendered = match format {
                ReportFormat::Text => render_report_text(&report, &loaded.catalog),
                ReportFormat::Json => render_report_json(&report)?,
            };
            println!("{rendered}");
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
