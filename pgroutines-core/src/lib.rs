//! Core library for pgroutines.
//!
//! Reads stored functions and procedures from a PostgreSQL catalog and
//! decides where each one is written on disk. The `pgroutines-export`
//! binary drives these pieces as a single sequential pipeline.
//!
//! # Security Guarantees
//! - Credentials are held in zeroizing containers and never logged
//! - All catalog reads happen in one read-only transaction
//!
//! # Architecture
//! - `config`: environment → [`ExportConfig`], schema list resolution
//! - `adapters`: the [`RoutineSource`] seam and the PostgreSQL reader
//! - `models`: the immutable [`Routine`] record
//! - `paths`: slug sanitizing and output path construction

pub mod adapters;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod paths;
pub mod security;

// Re-export commonly used types
pub use adapters::RoutineSource;
pub use adapters::postgres::{PostgresSession, RoutineCatalog};
pub use config::{ConnectionConfig, ExportConfig, resolve_schemas};
pub use error::{PgRoutinesError, Result};
pub use logging::init_logging;
pub use models::{Routine, RoutineKind};
pub use paths::{build_path, safe_slug};
