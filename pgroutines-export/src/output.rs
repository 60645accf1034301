//! File output for exported routine definitions.

use pgroutines_core::{PgRoutinesError, Result};
use std::path::Path;

/// Writes one routine definition, creating parent directories as needed.
///
/// An existing file at `path` is overwritten; no backup is kept.
pub async fn write_definition(path: &Path, definition: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            PgRoutinesError::io(format!("Failed to create {}", parent.display()), e)
        })?;
    }

    tokio::fs::write(path, definition)
        .await
        .map_err(|e| PgRoutinesError::io(format!("Failed to write to {}", path.display()), e))?;

    tracing::debug!("Wrote {} bytes to {}", definition.len(), path.display());
    Ok(())
}
