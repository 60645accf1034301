//! Routine sources.
//!
//! The exporter only needs two operations from a database: list the
//! routines in a set of schemas, and fetch one routine's definition. They
//! form the [`RoutineSource`] trait so the export loop can run against the
//! PostgreSQL catalog or against an in-memory source in tests.
//!
//! # Module Structure
//! - `helpers`: Row decoding and query error mapping
//! - `postgres`: Single-connection PostgreSQL session and catalog reader

use crate::{Result, models::Routine};
use async_trait::async_trait;

pub mod helpers;
pub mod postgres;

/// Read access to stored routines.
///
/// # Security
/// Implementations perform read-only queries and never expose credentials
/// in returned data or errors.
#[async_trait]
pub trait RoutineSource: Send {
    /// Lists functions and procedures in `schemas`, ordered by schema,
    /// name, then oid. An empty list is not an error.
    ///
    /// # Errors
    /// Returns a collection error if the catalog query fails or a row
    /// cannot be decoded.
    async fn list_routines(&mut self, schemas: &[String]) -> Result<Vec<Routine>>;

    /// Fetches the complete `CREATE OR REPLACE` text of one routine, verbatim.
    ///
    /// # Errors
    /// Returns `MissingDefinition` if the oid yields no definition.
    async fn fetch_definition(&mut self, oid: u32) -> Result<String>;
}
