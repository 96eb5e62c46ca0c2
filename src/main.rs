//! Rejar - strip and re-apply JAR signatures with reusable profiles.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use rejar::cli::output;
use rejar::cli::{execute, Cli};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env("REJAR_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("rejar=debug")
        } else {
            EnvFilter::new("rejar=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).without_time())
        .init();

    if let Err(e) = execute(cli.command) {
        // Format error with suggestion if available
        let suggestion = match &e {
            rejar::error::Error::Command(rejar::error::CommandError::ToolNotFound(_)) => {
                Some("run: rejar jdk /path/to/jdk")
            }
            rejar::error::Error::Store(rejar::error::StoreError::Locked) => {
                Some("run: rejar reset (deletes every stored profile)")
            }
            rejar::error::Error::Store(rejar::error::StoreError::NotFound(_)) => {
                Some("run: rejar profile list")
            }
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
