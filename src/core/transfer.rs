// Transfer tool wrapper (rclone)
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{ReelError, Result};

/// Copies a local file tree to a remote destination such as `gdrive:Movies/Horror`
pub trait Transfer: Send + Sync {
    /// Returns the tool's exit code; a spawn failure is an error
    fn move_to(&self, local_path: &Path, remote_destination: &str) -> Result<i32>;
}

pub struct RcloneTransfer {
    binary: PathBuf,
    log_prefix: Option<String>,
}

impl RcloneTransfer {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            log_prefix: None,
        }
    }

    /// Log to `<prefix><YYYY-MM-DD>.log`, one file per day
    pub fn with_log_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.log_prefix = if prefix.is_empty() { None } else { Some(prefix) };
        self
    }

    fn log_file(&self) -> Option<PathBuf> {
        self.log_prefix
            .as_ref()
            .map(|prefix| dated_log_path(prefix, chrono::Local::now().date_naive()))
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Resolve the configured binary, falling back to `rclone` on the PATH
    pub fn resolve_binary(&self) -> Result<PathBuf> {
        if !self.binary.as_os_str().is_empty() && self.binary.exists() {
            return Ok(self.binary.clone());
        }

        let name = if self.binary.as_os_str().is_empty() {
            Path::new("rclone")
        } else {
            self.binary.as_path()
        };

        which::which(name).map_err(|_| {
            ReelError::input_missing(format!("rclone binary not found: {}", name.display()))
        })
    }

    fn build_command(&self, binary: &Path, local_path: &Path, remote_destination: &str) -> Command {
        let mut cmd = Command::new(binary);
        cmd.arg("move").arg(local_path).arg(remote_destination);

        if let Some(log_file) = self.log_file() {
            cmd.arg("--log-file").arg(log_file).arg("--log-level").arg("INFO");
        }

        cmd
    }
}

impl Transfer for RcloneTransfer {
    fn move_to(&self, local_path: &Path, remote_destination: &str) -> Result<i32> {
        let binary = self.resolve_binary()?;

        log::info!(
            "rclone move {} -> {}",
            local_path.display(),
            remote_destination
        );

        let status = self
            .build_command(&binary, local_path, remote_destination)
            .status()
            .map_err(|e| ReelError::upload_failed(format!("failed to execute rclone: {}", e)))?;

        // A signal-terminated process has no code; report it as a failure
        Ok(status.code().unwrap_or(-1))
    }
}

pub fn dated_log_path(prefix: &str, date: chrono::NaiveDate) -> PathBuf {
    PathBuf::from(format!("{}{}.log", prefix, date.format("%Y-%m-%d")))
}
