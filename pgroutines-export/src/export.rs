//! The export loop: list routines, fetch each definition, write one file per
//! routine and report progress on the console.
//!
//! The loop is strictly sequential and stops at the first failure. Files
//! already written by then stay on disk.

use crate::output::write_definition;
use pgroutines_core::{
    PgRoutinesError, Result, RoutineSource, build_path, config::format_schema_list,
    paths::CollisionTracker,
};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Result of a completed export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The listing came back empty; nothing was written.
    NoRoutines,
    /// Every listed routine was written.
    Exported(ExportSummary),
}

/// Counters for a run that wrote at least one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    /// Files written, including ones that overwrote an earlier file this run
    pub written: usize,
    /// Routines whose path had already been used by another routine
    pub collisions: usize,
    /// Directory the files were written under
    pub output_root: PathBuf,
}

impl ExportOutcome {
    /// Number of files written.
    pub const fn written(&self) -> usize {
        match self {
            Self::NoRoutines => 0,
            Self::Exported(summary) => summary.written,
        }
    }
}

/// Exports every routine `source` lists in `schemas` under `output_root`.
///
/// Console output goes to `out`: one line per written path, then a blank
/// line and a summary. An empty listing prints a single notice instead.
///
/// # Errors
/// Returns the first listing, fetch or write failure unchanged.
pub async fn export_routines<S, W>(
    source: &mut S,
    schemas: &[String],
    output_root: &Path,
    out: &mut W,
) -> Result<ExportOutcome>
where
    S: RoutineSource + ?Sized,
    W: Write,
{
    let routines = source.list_routines(schemas).await?;

    if routines.is_empty() {
        tracing::info!("Nothing to export");
        emit(
            out,
            format_args!(
                "No routines found in schemas: {}",
                format_schema_list(schemas)
            ),
        )?;
        return Ok(ExportOutcome::NoRoutines);
    }

    tracing::info!(
        "Exporting {} routines to {}",
        routines.len(),
        output_root.display()
    );

    let mut collisions = CollisionTracker::new();
    let mut collision_count: usize = 0;
    let mut written: usize = 0;

    for routine in &routines {
        let definition = source.fetch_definition(routine.oid).await?;
        let path = build_path(output_root, routine);

        if let Some(previous) = collisions.claim(&path, routine) {
            tracing::warn!(
                "{} overwrites {} at {}",
                routine.qualified_signature(),
                previous,
                path.display()
            );
            collision_count = collision_count.saturating_add(1);
        }

        write_definition(&path, &definition).await?;
        emit(out, format_args!("{}", path.display()))?;
        written = written.saturating_add(1);
    }

    emit(
        out,
        format_args!(
            "\n✓ {} routines saved to {}",
            written,
            output_root.display()
        ),
    )?;

    Ok(ExportOutcome::Exported(ExportSummary {
        written,
        collisions: collision_count,
        output_root: output_root.to_path_buf(),
    }))
}

fn emit<W: Write>(out: &mut W, line: std::fmt::Arguments<'_>) -> Result<()> {
    writeln!(out, "{}", line).map_err(|e| PgRoutinesError::io("Failed to write to stdout", e))
}
