//! Database connection configuration.

use std::time::Duration;

/// Default PostgreSQL port.
pub const DEFAULT_PORT: u16 = 5432;

/// Default time allowed for establishing the connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for the single exporter connection.
///
/// # Security
/// This struct intentionally does NOT store passwords or credentials.
/// They live in [`crate::security::Credentials`] and are never logged.
///
/// # Example
/// ```rust
/// use pgroutines_core::config::ConnectionConfig;
///
/// let config = ConnectionConfig::new("localhost".to_string(), "mydb".to_string())
///     .with_port(6543);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.to_string(), "localhost:6543/mydb");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Database host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Database (catalog) to export
    pub database: String,
    /// Time allowed for the initial connection; zero waits indefinitely
    pub connect_timeout: Duration,
    /// Whether the export transaction is opened READ ONLY
    pub read_only: bool,
    /// `application_name` reported to the server
    pub application_name: String,
}

impl std::fmt::Display for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never include the user or credentials
        write!(f, "{}:{}/{}", self.host, self.port, self.database)
    }
}

impl ConnectionConfig {
    /// Creates a new connection config with the default port and timeout.
    pub fn new(host: String, database: String) -> Self {
        Self {
            host,
            port: DEFAULT_PORT,
            database,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_only: true,
            application_name: format!("pgroutines-export-{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Builder method to set port.
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Builder method to set the connect timeout.
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Bound on connecting, `None` when `connect_timeout` is zero.
    ///
    /// Zero follows libpq's `connect_timeout=0`: wait indefinitely.
    pub fn connect_limit(&self) -> Option<Duration> {
        (!self.connect_timeout.is_zero()).then_some(self.connect_timeout)
    }

    /// Bound on the orderly close at the end of a run.
    ///
    /// Always finite so a server that stops answering cannot hold the
    /// process open; falls back to [`DEFAULT_CONNECT_TIMEOUT`] when connecting
    /// is unbounded.
    pub fn close_limit(&self) -> Duration {
        self.connect_limit().unwrap_or(DEFAULT_CONNECT_TIMEOUT)
    }

    /// Validates connection configuration parameters.
    ///
    /// # Errors
    /// Returns error if host or database is blank or the port is zero
    pub fn validate(&self) -> crate::Result<()> {
        if self.host.trim().is_empty() {
            return Err(crate::error::PgRoutinesError::configuration(
                "host cannot be empty",
            ));
        }

        if self.database.trim().is_empty() {
            return Err(crate::error::PgRoutinesError::configuration(
                "database cannot be empty",
            ));
        }

        if self.port == 0 {
            return Err(crate::error::PgRoutinesError::configuration(
                "port must be greater than 0",
            ));
        }

        Ok(())
    }
}
