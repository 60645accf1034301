//! PostgreSQL routine enumeration and definition retrieval.
//!
//! # PostgreSQL Routine Types
//! - `FUNCTION` - prokind `f`
//! - `PROCEDURE` - prokind `p` (PostgreSQL 11+)
//!
//! Aggregates (`a`) and window functions (`w`) are excluded.

use crate::Result;
use crate::adapters::helpers::{RowExt, catalog_query_error};
use crate::error::PgRoutinesError;
use crate::models::{Routine, RoutineKind};
use sqlx::PgConnection;
use sqlx::postgres::types::Oid;

/// First `server_version_num` that has `pg_proc.prokind`.
pub const PROKIND_MIN_VERSION_NUM: i32 = 110_000;

/// Routine listing for PostgreSQL 11+.
const ROUTINES_QUERY: &str = r#"
    SELECT
        current_database()::text AS catalog,
        n.nspname::text AS schema_name,
        p.proname::text AS routine_name,
        p.oid AS oid,
        p.prokind::text AS prokind,
        pg_get_function_identity_arguments(p.oid)::text AS identity_args
    FROM pg_proc p
    JOIN pg_namespace n ON n.oid = p.pronamespace
    WHERE n.nspname::text = ANY($1)
      AND p.prokind IN ('f', 'p')
    ORDER BY n.nspname, p.proname, p.oid
"#;

/// Routine listing for servers without `prokind`; everything is a function.
const LEGACY_ROUTINES_QUERY: &str = r#"
    SELECT
        current_database()::text AS catalog,
        n.nspname::text AS schema_name,
        p.proname::text AS routine_name,
        p.oid AS oid,
        'f'::text AS prokind,
        pg_get_function_identity_arguments(p.oid)::text AS identity_args
    FROM pg_proc p
    JOIN pg_namespace n ON n.oid = p.pronamespace
    WHERE n.nspname::text = ANY($1)
      AND NOT p.proisagg
      AND NOT p.proiswindow
    ORDER BY n.nspname, p.proname, p.oid
"#;

const DEFINITION_QUERY: &str = "SELECT pg_get_functiondef($1)::text";

/// Picks the listing query for a server version.
pub(crate) const fn routines_query(server_version_num: i32) -> &'static str {
    if server_version_num >= PROKIND_MIN_VERSION_NUM {
        ROUTINES_QUERY
    } else {
        LEGACY_ROUTINES_QUERY
    }
}

/// Reads `server_version_num` (e.g. 160004 for 16.4).
pub(crate) async fn server_version_num(conn: &mut PgConnection) -> Result<i32> {
    sqlx::query_scalar::<_, i32>("SELECT current_setting('server_version_num')::integer")
        .fetch_one(conn)
        .await
        .map_err(|e| PgRoutinesError::collection_failed("Failed to get PostgreSQL version", e))
}

/// Lists functions and procedures in `schemas`.
///
/// One query for the whole set, ordered by schema, name and oid so repeated
/// runs against an unchanged database list routines in the same order.
pub(crate) async fn list_routines(
    conn: &mut PgConnection,
    server_version_num: i32,
    schemas: &[String],
) -> Result<Vec<Routine>> {
    tracing::debug!("Listing routines in schemas {:?}", schemas);

    if server_version_num < PROKIND_MIN_VERSION_NUM {
        tracing::info!(
            "PostgreSQL {} does not support procedures (requires 11+); exporting functions only",
            server_version_num
        );
    }

    let rows = sqlx::query(routines_query(server_version_num))
        .bind(schemas)
        .fetch_all(conn)
        .await
        .map_err(|e| {
            tracing::error!("Failed to enumerate routines: {}", e);
            catalog_query_error("pg_proc", e)
        })?;

    let mut routines = Vec::with_capacity(rows.len());
    for row in &rows {
        let catalog: String = row.get_field("catalog", Some("pg_proc"))?;
        let schema: String = row.get_field("schema_name", Some("pg_proc"))?;
        let name: String = row.get_field("routine_name", Some("pg_proc"))?;
        let oid: Oid = row.get_field("oid", Some("pg_proc"))?;
        let prokind: String = row.get_field("prokind", Some("pg_proc"))?;
        let identity_args: Option<String> = row.get_field("identity_args", Some("pg_proc"))?;

        let routine = routine_from_catalog(oid.0, catalog, schema, name, &prokind, identity_args)?;
        tracing::trace!("Found {} '{}'", routine.kind, routine.qualified_signature());
        routines.push(routine);
    }

    tracing::info!("Found {} routines", routines.len());
    Ok(routines)
}

/// Builds a [`Routine`] from decoded catalog columns, rejecting kinds the
/// listing query should never return.
pub(crate) fn routine_from_catalog(
    oid: u32,
    catalog: String,
    schema: String,
    name: String,
    prokind: &str,
    identity_args: Option<String>,
) -> Result<Routine> {
    let kind = RoutineKind::from_prokind(prokind).ok_or_else(|| PgRoutinesError::Collection {
        context: format!("Unexpected routine kind for {}.{} (oid {})", schema, name, oid),
        source: format!("prokind '{}' is neither 'f' nor 'p'", prokind).into(),
    })?;

    Ok(Routine::new(oid, catalog, schema, name, kind, identity_args))
}

/// Fetches `pg_get_functiondef(oid)` verbatim.
///
/// A missing row or NULL result means the routine vanished or the catalog is
/// inconsistent; that is reported as `MissingDefinition`, not retried.
pub(crate) async fn fetch_definition(conn: &mut PgConnection, oid: u32) -> Result<String> {
    let definition: Option<Option<String>> = sqlx::query_scalar(DEFINITION_QUERY)
        .bind(Oid(oid))
        .fetch_optional(conn)
        .await
        .map_err(|e| {
            PgRoutinesError::collection_failed(
                format!("Failed to fetch definition for oid {}", oid),
                e,
            )
        })?;

    definition
        .flatten()
        .ok_or(PgRoutinesError::MissingDefinition { oid })
}
