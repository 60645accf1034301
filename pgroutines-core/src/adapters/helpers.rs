//! Row decoding helpers shared by the catalog queries.

use crate::{Result, error::PgRoutinesError};
use sqlx::{Row, postgres::PgRow};

/// Extension trait for extracting typed values from database rows
/// with consistent error handling.
///
/// # Example
/// ```rust,ignore
/// use pgroutines_core::adapters::helpers::RowExt;
///
/// let name: String = row.get_field("routine_name", Some("pg_proc"))?;
/// let args: Option<String> = row.get_field("identity_args", None)?;
/// ```
pub trait RowExt {
    /// Extracts a typed field from the row with proper error context.
    ///
    /// # Arguments
    /// * `field_name` - Name of the column to extract
    /// * `table_context` - Optional catalog table name for error messages
    fn get_field<'r, T>(&'r self, field_name: &str, table_context: Option<&str>) -> Result<T>
    where
        T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>;
}

impl RowExt for PgRow {
    fn get_field<'r, T>(&'r self, field_name: &str, table_context: Option<&str>) -> Result<T>
    where
        T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
    {
        self.try_get(field_name)
            .map_err(|e| PgRoutinesError::parse_field(field_name, table_context, e))
    }
}

/// Maps a catalog query failure, calling out missing privileges separately.
pub(crate) fn catalog_query_error(resource: &str, error: sqlx::Error) -> PgRoutinesError {
    let insufficient_privilege = matches!(
        &error,
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("42501")
    );
    if insufficient_privilege {
        PgRoutinesError::collection_failed(
            format!("Cannot access {} - insufficient privileges", resource),
            error,
        )
    } else {
        PgRoutinesError::collection_failed(format!("Failed to query {}", resource), error)
    }
}
