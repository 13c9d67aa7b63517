use anyhow::Result;
use clap::Parser;
use phrasecount::cli::{self, RunStatus};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Exit status when some sources failed but the rest were reported
const EXIT_PARTIAL: i32 = 2;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Logs go to stderr so stdout carries only the report; RUST_LOG wins over --log-level
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli::run(cli)? {
        RunStatus::Complete => Ok(()),
        RunStatus::Partial => std::process::exit(EXIT_PARTIAL),
    }
}
