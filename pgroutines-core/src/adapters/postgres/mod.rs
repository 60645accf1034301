//! PostgreSQL session and routine catalog reader.
//!
//! # Module Structure
//! - `connection`: Establishing and closing the single connection
//! - `routines`: `pg_proc` enumeration and `pg_get_functiondef` retrieval
//!
//! # Security Guarantees
//! - All catalog reads run inside one `READ ONLY` transaction
//! - Credentials are never logged or included in errors
//! - One connection per run; no pooling, no retries

mod connection;
mod routines;

use super::RoutineSource;
use crate::config::ConnectionConfig;
use crate::error::PgRoutinesError;
use crate::{Result, models::Routine};
use async_trait::async_trait;
use sqlx::{Connection, PgConnection, Postgres, Transaction};

pub use routines::PROKIND_MIN_VERSION_NUM;

/// The exporter's single PostgreSQL connection.
///
/// Acquire with [`PostgresSession::connect`], read through
/// [`PostgresSession::begin_export`], release with
/// [`PostgresSession::close`].
pub struct PostgresSession {
    conn: PgConnection,
    config: ConnectionConfig,
}

impl std::fmt::Debug for PostgresSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresSession")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PostgresSession {
    /// Connection settings this session was opened with.
    pub const fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Opens the export transaction and returns a catalog reader bound to it.
    ///
    /// The transaction is `READ ONLY` when the configuration asks for it
    /// (the default), giving every query in the run one consistent snapshot.
    /// Dropping the reader without [`RoutineCatalog::finish`] rolls it back.
    pub async fn begin_export(&mut self) -> Result<RoutineCatalog<'_>> {
        let read_only = self.config.read_only;

        let mut tx = self
            .conn
            .begin()
            .await
            .map_err(|e| PgRoutinesError::collection_failed("Failed to begin transaction", e))?;

        if read_only {
            sqlx::query("SET TRANSACTION READ ONLY")
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    PgRoutinesError::collection_failed("Failed to set transaction read-only", e)
                })?;
        }

        let server_version_num = routines::server_version_num(&mut tx).await?;
        tracing::debug!("PostgreSQL server_version_num {}", server_version_num);

        Ok(RoutineCatalog {
            tx,
            server_version_num,
        })
    }
}

/// Routine reader scoped to one export transaction.
pub struct RoutineCatalog<'c> {
    tx: Transaction<'c, Postgres>,
    server_version_num: i32,
}

impl std::fmt::Debug for RoutineCatalog<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutineCatalog")
            .field("server_version_num", &self.server_version_num)
            .finish_non_exhaustive()
    }
}

impl RoutineCatalog<'_> {
    /// Server version as reported by `server_version_num`.
    pub const fn server_version_num(&self) -> i32 {
        self.server_version_num
    }

    /// Ends the export transaction.
    ///
    /// Nothing was written, so committing and rolling back are equivalent;
    /// commit is used so the server logs a clean end.
    pub async fn finish(self) -> Result<()> {
        self.tx
            .commit()
            .await
            .map_err(|e| PgRoutinesError::collection_failed("Failed to end transaction", e))
    }
}

#[async_trait]
impl<'c> RoutineSource for RoutineCatalog<'c> {
    async fn list_routines(&mut self, schemas: &[String]) -> Result<Vec<Routine>> {
        routines::list_routines(&mut self.tx, self.server_version_num, schemas).await
    }

    async fn fetch_definition(&mut self, oid: u32) -> Result<String> {
        routines::fetch_definition(&mut self.tx, oid).await
    }
}
