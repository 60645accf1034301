//! PostgreSQL routine exporter.
//!
//! Writes every function and procedure in the configured schemas to its own
//! `.sql` file and prints each path as it goes.
//!
//! # Security Guarantees
//! - Catalog reads run in a read-only transaction
//! - The password is read from `PG_PASSWORD` only and never logged

use clap::Parser;
use pgroutines_core::{ExportConfig, error::EXIT_SUCCESS, init_logging};
use pgroutines_export::{Cli, error_report, run};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.global.verbose, cli.global.quiet) {
        eprintln!("{}", error_report(&e));
        return ExitCode::from(e.exit_code());
    }

    let config = match ExportConfig::from_env() {
        Ok(config) => match cli.output_dir {
            Some(dir) => config.with_output_root(dir),
            None => config,
        },
        Err(e) => {
            tracing::error!("Configuration failed: {}", e);
            eprintln!("{}", error_report(&e));
            return ExitCode::from(e.exit_code());
        }
    };

    let mut stdout = std::io::stdout().lock();
    match run(&config, &mut stdout).await {
        Ok(outcome) => {
            tracing::info!("Export finished, {} files written", outcome.written());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            tracing::debug!("Export failed: {:?}", e);
            eprintln!("{}", error_report(&e));
            ExitCode::from(e.exit_code())
        }
    }
}
