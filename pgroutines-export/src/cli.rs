//! Command-line arguments.
//!
//! Connection settings come from `PG_*` environment variables; the command
//! line only controls logging and the output location.

use clap::{Args, Parser};
use std::path::PathBuf;

/// Command-line interface of `pgroutines-export`.
#[derive(Debug, Parser)]
#[command(name = "pgroutines-export")]
#[command(about = "Export PostgreSQL functions and procedures as .sql files")]
#[command(version)]
#[command(long_about = "
pgroutines-export - one .sql file per PostgreSQL routine

Lists the functions and procedures in the configured schemas and writes each
definition, as returned by pg_get_functiondef, to
<output>/<database>/<schema>/<function|procedure>/<name>__<args>.sql

CONFIGURATION (environment):
  PG_HOST, PG_DATABASE, PG_USER, PG_PASSWORD   required
  PG_PORT              default 5432
  PG_CONNECT_TIMEOUT   seconds, default 10, 0 waits indefinitely
  PG_SCHEMAS           comma or space separated, default: old_db, scoring

EXIT CODES:
  0 success, 1 runtime error, 2 configuration or connection failure,
  130 interrupted
")]
pub struct Cli {
    /// Logging flags
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Output directory
    #[arg(
        short,
        long,
        value_name = "DIR",
        help = "Write routines under DIR instead of procedures/ next to the executable"
    )]
    pub output_dir: Option<PathBuf>,
}

/// Flags controlling log output.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, help = "Suppress log output except errors")]
    pub quiet: bool,
}
