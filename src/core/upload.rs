use std::path::Path;
use std::sync::Arc;

use crate::core::rotation::RemoteRotation;
use crate::core::transfer::Transfer;
use crate::error::{ReelError, Result};

/// Mirrors relocated media to the next remote in rotation
pub struct UploadDispatcher {
    rotation: Arc<RemoteRotation>,
    transfer: Arc<dyn Transfer>,
}

impl UploadDispatcher {
    pub fn new(rotation: Arc<RemoteRotation>, transfer: Arc<dyn Transfer>) -> Self {
        Self { rotation, transfer }
    }

    pub fn rotation(&self) -> &RemoteRotation {
        &self.rotation
    }

    /// Upload `local_path` to the next remote and return the remote's name.
    ///
    /// The rotation slot is consumed before the transfer starts; a failed
    /// transfer does not hand the same remote out again.
    pub fn dispatch_next(&self, local_path: &Path, local_base: &Path) -> Result<String> {
        let destination_dir = remote_relative_dir(local_path, local_base)?;
        let claim = self.rotation.claim_next()?;
        let destination = remote_destination(&claim.remote, &destination_dir);

        let code = self.transfer.move_to(local_path, &destination)?;
        if code != 0 {
            return Err(ReelError::upload_failed(format!(
                "transfer of {} to {} exited with status {}",
                local_path.display(),
                destination,
                code
            )));
        }

        log::info!("Uploaded {} to {}", local_path.display(), destination);
        Ok(claim.remote)
    }
}

/// The file's directory relative to `local_base`, with `/` separators
pub fn remote_relative_dir(local_path: &Path, local_base: &Path) -> Result<String> {
    let parent = local_path.parent().unwrap_or_else(|| Path::new(""));
    let relative = parent.strip_prefix(local_base).map_err(|_| {
        ReelError::upload_failed(format!(
            "{} is not under {}",
            local_path.display(),
            local_base.display()
        ))
    })?;

    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();
    Ok(parts.join("/"))
}

pub fn remote_destination(remote: &str, relative_dir: &str) -> String {
    format!("{}:{}", remote, relative_dir)
}
