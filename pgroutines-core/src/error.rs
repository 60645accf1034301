//! Error types with credential sanitization and exit-code mapping.
//!
//! Every failure the exporter can hit is represented here so the binary can
//! report it once on stderr and turn it into the right process exit code.
//! Passwords are never part of any error message.

use std::time::Duration;
use thiserror::Error;

/// Exit code for a successful run, including "no routines found".
pub const EXIT_SUCCESS: u8 = 0;
/// Exit code for any failure after the connection was established.
pub const EXIT_RUNTIME_FAILURE: u8 = 1;
/// Exit code for configuration and connection failures.
pub const EXIT_CONNECTION_FAILURE: u8 = 2;
/// Exit code for a user interrupt (128 + SIGINT).
pub const EXIT_INTERRUPTED: u8 = 130;

/// Main error type for pgroutines operations.
///
/// # Security
/// Connection errors carry only host/port/database context; the password
/// held in [`crate::security::Credentials`] never reaches an error message.
#[derive(Debug, Error)]
pub enum PgRoutinesError {
    /// A required environment variable is absent
    #[error("Missing required env var: {key}")]
    MissingConfig {
        /// Name of the absent variable
        key: String,
    },

    /// An optional setting could not be parsed or is out of range
    #[error("Configuration error: {message}")]
    Configuration {
        /// What was wrong with the setting
        message: String,
    },

    /// Database connection failed (credentials sanitized)
    #[error("Failed to connect to PostgreSQL: {context}")]
    Connection {
        /// Target as `host:port/database`
        context: String,
        /// Driver error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The server did not answer within the configured bound
    #[error("Failed to connect to PostgreSQL: timed out after {}s", timeout.as_secs())]
    ConnectionTimeout {
        /// The bound that elapsed
        timeout: Duration,
    },

    /// A catalog query or row decode failed
    #[error("Catalog query failed: {context}")]
    Collection {
        /// Which query or field failed
        context: String,
        /// Driver or decode error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The catalog listed a routine whose definition cannot be retrieved
    #[error("pg_get_functiondef returned no rows for oid={oid}")]
    MissingDefinition {
        /// `pg_proc.oid` of the routine
        oid: u32,
    },

    /// I/O operation failed
    #[error("I/O operation failed: {context}")]
    Io {
        /// Path or stream involved
        context: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The run was cancelled by the user
    #[error("Interrupted.")]
    Interrupted,
}

/// Convenience type alias for Results with PgRoutinesError
pub type Result<T> = std::result::Result<T, PgRoutinesError>;

impl PgRoutinesError {
    /// Creates a missing-configuration error naming the absent key
    pub fn missing_config(key: impl Into<String>) -> Self {
        Self::MissingConfig { key: key.into() }
    }

    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a connection error with sanitized context
    pub fn connection_failed<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Connection {
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates a catalog collection error with context
    pub fn collection_failed<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Collection {
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates a parsing error for database column extraction
    ///
    /// # Arguments
    /// * `field_name` - Name of the field being parsed
    /// * `table_context` - Optional catalog table for better error messages
    /// * `error` - The underlying decode error
    pub fn parse_field<E>(field_name: &str, table_context: Option<&str>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let context = match table_context {
            Some(table) => format!(
                "Failed to parse field '{}' from result for table '{}'",
                field_name, table
            ),
            None => format!(
                "Failed to parse field '{}' from database result",
                field_name
            ),
        };
        Self::Collection {
            context,
            source: Box::new(error),
        }
    }

    /// Creates an I/O error with the path or operation that failed
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Process exit code reported for this error.
    ///
    /// Configuration and connection failures share code 2 so callers can
    /// tell "never reached the database" apart from a failed export (1).
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::MissingConfig { .. }
            | Self::Configuration { .. }
            | Self::Connection { .. }
            | Self::ConnectionTimeout { .. } => EXIT_CONNECTION_FAILURE,
            Self::Interrupted => EXIT_INTERRUPTED,
            Self::Collection { .. } | Self::MissingDefinition { .. } | Self::Io { .. } => {
                EXIT_RUNTIME_FAILURE
            }
        }
    }
}
