//! Library side of the `pgroutines-export` binary.
//!
//! Exposes the export loop and its console reporting so they can be driven
//! against any [`RoutineSource`] in tests. `main.rs` only wires the CLI,
//! logging and exit code around [`run`].

pub mod cli;
pub mod export;
pub mod output;

pub use cli::{Cli, GlobalArgs};
pub use export::{ExportOutcome, ExportSummary, export_routines};

use pgroutines_core::{ExportConfig, PgRoutinesError, PostgresSession, Result, RoutineSource};
use std::error::Error as _;
use std::future::Future;
use std::io::Write;

/// Connects, exports every routine and closes the connection.
///
/// Ctrl-C during either the connect or the export aborts the current step
/// with [`PgRoutinesError::Interrupted`]. The session, once opened, is closed
/// whether the export succeeded, failed or was interrupted. Closing is not
/// interruptible but is bounded by the session's close limit.
pub async fn run<W: Write>(config: &ExportConfig, out: &mut W) -> Result<ExportOutcome> {
    tracing::info!("Connecting to {}", config.connection);
    let mut session = interruptible(PostgresSession::connect(
        &config.connection,
        &config.credentials,
    ))
    .await?;

    let result = interruptible(export_in_session(&mut session, config, out)).await;

    tracing::debug!("Closing connection to {}", session.config());
    if let Err(e) = session.close().await {
        tracing::warn!("Failed to close connection cleanly: {}", e);
    }
    result
}

/// Runs the export inside one read-only transaction.
///
/// The transaction is committed only after every file is written; on error
/// it is dropped and rolled back.
async fn export_in_session<W: Write>(
    session: &mut PostgresSession,
    config: &ExportConfig,
    out: &mut W,
) -> Result<ExportOutcome> {
    let mut catalog = session.begin_export().await?;
    tracing::debug!("Server version {}", catalog.server_version_num());

    let outcome = export_with_source(&mut catalog, config, out).await?;
    catalog.finish().await?;
    Ok(outcome)
}

/// Exports from an already opened source using the configured schemas and
/// output root.
pub async fn export_with_source<S, W>(
    source: &mut S,
    config: &ExportConfig,
    out: &mut W,
) -> Result<ExportOutcome>
where
    S: RoutineSource + ?Sized,
    W: Write,
{
    export_routines(source, &config.schemas, &config.output_root, out).await
}

/// Races `work` against Ctrl-C.
///
/// Returns [`PgRoutinesError::Interrupted`] if Ctrl-C arrives first. If the
/// signal listener cannot be installed the work runs to completion without
/// interrupt support.
pub async fn interruptible<F, T>(work: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::pin!(work);
    tokio::select! {
        result = &mut work => result,
        signal = tokio::signal::ctrl_c() => match signal {
            Ok(()) => {
                tracing::warn!("Received interrupt, stopping");
                Err(PgRoutinesError::Interrupted)
            }
            Err(e) => {
                tracing::warn!("Cannot listen for Ctrl-C: {}", e);
                work.await
            }
        },
    }
}

/// Formats an error for stderr.
///
/// Connection failures keep their own prefix, an interrupt prints on a fresh
/// line, and everything else is prefixed with `Error:`. Source errors are
/// appended so driver messages such as authentication failures are visible.
pub fn error_report(err: &PgRoutinesError) -> String {
    let mut report = match err {
        PgRoutinesError::Interrupted => return format!("\n{}", err),
        PgRoutinesError::Connection { .. } | PgRoutinesError::ConnectionTimeout { .. } => {
            err.to_string()
        }
        _ => format!("Error: {}", err),
    };

    let mut source = err.source();
    while let Some(cause) = source {
        // sqlx repeats the inner database message in its own Display
        let text = cause.to_string();
        if !report.contains(&text) {
            report.push_str(": ");
            report.push_str(&text);
        }
        source = cause.source();
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_error_report_prefixes() {
        assert_eq!(
            error_report(&PgRoutinesError::missing_config("PG_PASSWORD")),
            "Error: Missing required env var: PG_PASSWORD"
        );
        assert_eq!(
            error_report(&PgRoutinesError::MissingDefinition { oid: 16384 }),
            "Error: pg_get_functiondef returned no rows for oid=16384"
        );
        assert_eq!(
            error_report(&PgRoutinesError::Interrupted),
            "\nInterrupted."
        );
        assert_eq!(
            error_report(&PgRoutinesError::ConnectionTimeout {
                timeout: Duration::from_secs(10)
            }),
            "Failed to connect to PostgreSQL: timed out after 10s"
        );
    }

    #[test]
    fn test_error_report_appends_sources() {
        let err = PgRoutinesError::connection_failed(
            "db.internal:5432/mydb",
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused"),
        );
        assert_eq!(
            error_report(&err),
            "Failed to connect to PostgreSQL: db.internal:5432/mydb: connection refused"
        );

        let err = PgRoutinesError::io(
            "Failed to write to /out/a.sql",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied"),
        );
        assert_eq!(
            error_report(&err),
            "Error: I/O operation failed: Failed to write to /out/a.sql: permission denied"
        );
    }

    #[tokio::test]
    async fn test_run_unreachable_server_is_connection_failure() {
        let root = tempfile::tempdir().unwrap();
        let config = ExportConfig::from_lookup(|key| match key {
            "PG_HOST" => Some("127.0.0.1".to_string()),
            "PG_PORT" => Some("1".to_string()),
            "PG_CONNECT_TIMEOUT" => Some("2".to_string()),
            "PG_DATABASE" => Some("mydb".to_string()),
            "PG_USER" => Some("exporter".to_string()),
            "PG_PASSWORD" => Some("hunter2".to_string()),
            _ => None,
        })
        .unwrap()
        .with_output_root(root.path());
        let mut out = Vec::new();

        let err = run(&config, &mut out).await.unwrap_err();

        assert_eq!(err.exit_code(), 2);
        assert!(error_report(&err).starts_with("Failed to connect to PostgreSQL"));
        assert!(!error_report(&err).contains("hunter2"));
        assert!(out.is_empty());
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_interruptible_passes_through_result() {
        let value = interruptible(async { Ok::<_, PgRoutinesError>(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);

        let err = interruptible(async { Err::<(), _>(PgRoutinesError::MissingDefinition { oid: 1 }) })
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }
}
