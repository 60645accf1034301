//! Run configuration resolved once at startup.
//!
//! - `ConnectionConfig`: host, port, database and connect timeout
//! - `schemas`: the `PG_SCHEMAS` resolver and its default list
//! - `ExportConfig`: everything the exporter needs, built from the environment
//!
//! # Security
//! Only [`ExportConfig::credentials`] holds the password. Nothing below this
//! module reads the environment; components receive an `ExportConfig`.

mod connection;
mod schemas;

pub use connection::{ConnectionConfig, DEFAULT_CONNECT_TIMEOUT, DEFAULT_PORT};
pub use schemas::{DEFAULT_SCHEMAS, format_schema_list, resolve_schemas};

use crate::error::PgRoutinesError;
use crate::security::Credentials;
use crate::Result;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Database host (required)
pub const ENV_HOST: &str = "PG_HOST";
/// Database name (required)
pub const ENV_DATABASE: &str = "PG_DATABASE";
/// Login user (required)
pub const ENV_USER: &str = "PG_USER";
/// Login password (required)
pub const ENV_PASSWORD: &str = "PG_PASSWORD";
/// Server port (optional, default 5432)
pub const ENV_PORT: &str = "PG_PORT";
/// Connect timeout in seconds (optional, default 10)
pub const ENV_CONNECT_TIMEOUT: &str = "PG_CONNECT_TIMEOUT";
/// Comma/whitespace separated schema list (optional)
pub const ENV_SCHEMAS: &str = "PG_SCHEMAS";

/// Directory name of the default output root.
pub const OUTPUT_DIR_NAME: &str = "procedures";

/// Everything one export run needs.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Connection target
    pub connection: ConnectionConfig,
    /// Login for the connection
    pub credentials: Credentials,
    /// Schemas to export, in the order given
    pub schemas: Vec<String>,
    /// Root directory the routine files are written under
    pub output_root: PathBuf,
}

impl ExportConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    /// Returns `MissingConfig` naming the first required variable that is
    /// unset, or `Configuration` for a blank host/database or an
    /// unparseable port/timeout.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Required keys are checked in the order host, database, user, password
    /// before any optional value is parsed. A key that is set to an empty
    /// string counts as present: an empty password is passed through for
    /// trust or peer authentication, while a blank host or database is
    /// rejected by [`ConnectionConfig::validate`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required =
            |key: &str| -> Result<String> { lookup(key).ok_or_else(|| PgRoutinesError::missing_config(key)) };

        let host = required(ENV_HOST)?;
        let database = required(ENV_DATABASE)?;
        let user = required(ENV_USER)?;
        let password = required(ENV_PASSWORD)?;

        let port = parse_optional::<u16>(ENV_PORT, lookup(ENV_PORT))?.unwrap_or(DEFAULT_PORT);
        let connect_timeout = parse_optional::<u64>(ENV_CONNECT_TIMEOUT, lookup(ENV_CONNECT_TIMEOUT))?
            .map_or(DEFAULT_CONNECT_TIMEOUT, Duration::from_secs);

        let connection = ConnectionConfig::new(host, database)
            .with_port(port)
            .with_connect_timeout(connect_timeout);
        connection.validate()?;

        Ok(Self {
            connection,
            credentials: Credentials::new(user, password),
            schemas: resolve_schemas(lookup(ENV_SCHEMAS).as_deref()),
            output_root: default_output_root(),
        })
    }

    /// Replaces the output root.
    #[must_use]
    pub fn with_output_root(mut self, output_root: impl Into<PathBuf>) -> Self {
        self.output_root = output_root.into();
        self
    }
}

/// Parses an optional numeric setting; unset or blank means "use default".
fn parse_optional<T>(key: &str, raw: Option<String>) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse::<T>().map(Some).map_err(|e| {
            PgRoutinesError::configuration(format!("Invalid {} value '{}': {}", key, value, e))
        }),
    }
}

/// `procedures/` next to the running executable, or in the working
/// directory when the executable path cannot be determined.
pub fn default_output_root() -> PathBuf {
    std::env::current_exe()
        .ok()
        .as_deref()
        .and_then(Path::parent)
        .map_or_else(|| PathBuf::from(OUTPUT_DIR_NAME), |dir| dir.join(OUTPUT_DIR_NAME))
}
