//! PostgreSQL connection establishment and release.
//!
//! # Security Features
//! - Credentials go straight from [`Credentials`] into the driver options
//! - Errors identify the target as `host:port/database`, never the login
//! - The connect attempt is bounded by the configured timeout (zero: none)
//! - Closing is always bounded so a silent server cannot stall shutdown

use super::PostgresSession;
use crate::Result;
use crate::config::ConnectionConfig;
use crate::error::PgRoutinesError;
use crate::security::Credentials;
use sqlx::postgres::PgConnectOptions;
use sqlx::{ConnectOptions, Connection};

impl PostgresSession {
    /// Opens the single connection used for the whole export.
    ///
    /// # Arguments
    /// * `config` - Connection target and timeout
    /// * `credentials` - Login (never logged)
    ///
    /// # Errors
    /// Returns error if:
    /// - The configuration is invalid
    /// - The server does not answer within a non-zero `connect_timeout`
    /// - Authentication, DNS or network setup fails
    pub async fn connect(config: &ConnectionConfig, credentials: &Credentials) -> Result<Self> {
        config.validate()?;

        tracing::info!("Connecting to PostgreSQL at {}", config);
        if !credentials.has_password() {
            tracing::debug!("No password set, relying on server-side trust or peer authentication");
        }

        let options = Self::connect_options(config, credentials);
        let connecting = options.connect();
        let connected = match config.connect_limit() {
            Some(limit) => tokio::time::timeout(limit, connecting).await.map_err(|_| {
                tracing::error!("Connection to {} timed out after {:?}", config, limit);
                PgRoutinesError::ConnectionTimeout { timeout: limit }
            })?,
            None => connecting.await,
        };
        let conn = connected.map_err(|e| PgRoutinesError::connection_failed(config.to_string(), e))?;

        tracing::debug!("Connected to {}", config);

        Ok(Self {
            conn,
            config: config.clone(),
        })
    }

    /// Builds driver options from the configuration.
    ///
    /// `PgConnectOptions::new` seeds values from libpq `PG*` variables; every
    /// field the exporter controls is overwritten here so only the explicit
    /// configuration applies.
    pub(crate) fn connect_options(
        config: &ConnectionConfig,
        credentials: &Credentials,
    ) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.database)
            .username(credentials.username())
            .password(credentials.password())
            .application_name(&config.application_name)
    }

    /// Closes the connection, telling the server the session is over.
    ///
    /// Dropping a session also releases the socket; `close` is the orderly
    /// path used on every normal and error exit. The goodbye is bounded by
    /// [`ConnectionConfig::close_limit`]; when it elapses the socket is
    /// dropped and `ConnectionTimeout` is returned.
    pub async fn close(self) -> Result<()> {
        let target = self.config.to_string();
        let limit = self.config.close_limit();

        tokio::time::timeout(limit, self.conn.close())
            .await
            .map_err(|_| {
                tracing::warn!("Closing connection to {} timed out after {:?}", target, limit);
                PgRoutinesError::ConnectionTimeout { timeout: limit }
            })?
            .map_err(|e| PgRoutinesError::connection_failed(format!("closing {}", target), e))?;
        tracing::debug!("Connection to {} closed", target);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_options_apply_config() {
        let config = ConnectionConfig::new("db.internal".to_string(), "mydb".to_string())
            .with_port(6543);
        let credentials = Credentials::new("exporter".to_string(), "s3cret".to_string());

        let options = PostgresSession::connect_options(&config, &credentials);
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_database(), Some("mydb"));
        assert_eq!(options.get_username(), "exporter");
        assert_eq!(
            options.get_application_name(),
            Some(config.application_name.as_str())
        );
    }

    #[tokio::test]
    async fn test_connect_invalid_config_fails_before_network() {
        let config = ConnectionConfig::new(String::new(), "mydb".to_string());
        let credentials = Credentials::new("exporter".to_string(), "s3cret".to_string());

        let err = PostgresSession::connect(&config, &credentials)
            .await
            .unwrap_err();
        assert!(matches!(err, PgRoutinesError::Configuration { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn test_connect_silent_server_times_out() {
        // Accepted by the kernel backlog, never answered
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let config = ConnectionConfig::new("127.0.0.1".to_string(), "mydb".to_string())
            .with_port(port)
            .with_connect_timeout(std::time::Duration::from_secs(1));
        let credentials = Credentials::new("exporter".to_string(), "s3cret".to_string());

        let err = PostgresSession::connect(&config, &credentials)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PgRoutinesError::ConnectionTimeout { timeout } if timeout.as_secs() == 1
        ));
        assert_eq!(err.exit_code(), 2);
        drop(listener);
    }

    #[tokio::test]
    async fn test_connect_refused_is_connection_error() {
        // Port 1 on loopback is not a PostgreSQL server
        let config = ConnectionConfig::new("127.0.0.1".to_string(), "mydb".to_string())
            .with_port(1)
            .with_connect_timeout(std::time::Duration::from_secs(5));
        let credentials = Credentials::new("exporter".to_string(), "s3cret".to_string());

        let err = PostgresSession::connect(&config, &credentials)
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(!err.to_string().contains("s3cret"));
    }
}
