use std::fs;
use std::path::Path;

use crate::error::{ReelError, Result};

/// Move `source` to `destination`, creating parent directories as needed.
///
/// Falls back to copy + remove when a plain rename is not possible, e.g. when
/// the destination is on another filesystem.
pub fn relocate(source: &Path, destination: &Path) -> Result<()> {
    if !source.is_file() {
        return Err(ReelError::move_failed(format!(
            "{} does not exist or is not a file",
            source.display()
        )));
    }

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            ReelError::move_failed(format!("cannot create {}: {}", parent.display(), e))
        })?;
    }

    match fs::rename(source, destination) {
        Ok(()) => {}
        Err(rename_err) => {
            log::debug!(
                "rename {} -> {} failed ({}), copying instead",
                source.display(),
                destination.display(),
                rename_err
            );
            fs::copy(source, destination).map_err(|e| {
                ReelError::move_failed(format!(
                    "{} -> {}: {}",
                    source.display(),
                    destination.display(),
                    e
                ))
            })?;
            fs::remove_file(source).map_err(|e| {
                ReelError::move_failed(format!(
                    "copied to {} but could not remove {}: {}",
                    destination.display(),
                    source.display(),
                    e
                ))
            })?;
        }
    }

    log::info!("Moved {} -> {}", source.display(), destination.display());
    Ok(())
}
