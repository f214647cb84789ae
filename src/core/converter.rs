// Converter - runs the external sickbeard_mp4_automator script on a media file
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{ReelError, Result};

/// Converted files always come out with this extension
pub const CONVERTED_EXTENSION: &str = "m4v";

/// Maps a source media file to its transcoded counterpart
pub trait Converter: Send + Sync {
    fn convert(&self, source: &Path) -> Result<PathBuf>;
}

pub struct SickbeardConverter {
    python: PathBuf,
    script: PathBuf,
}

impl SickbeardConverter {
    pub fn new(python: impl Into<PathBuf>, script: impl Into<PathBuf>) -> Self {
        Self {
            python: python.into(),
            script: script.into(),
        }
    }

    /// Where the converter writes its output for `source`
    pub fn output_path(source: &Path) -> PathBuf {
        source.with_extension(CONVERTED_EXTENSION)
    }

    /// Resolve the interpreter, either as given or through the PATH
    fn resolve_python(&self) -> Result<PathBuf> {
        if self.python.exists() {
            return Ok(self.python.clone());
        }

        let name = if self.python.as_os_str().is_empty() {
            Path::new("python3")
        } else {
            self.python.as_path()
        };

        which::which(name).map_err(|_| {
            ReelError::input_missing(format!("python interpreter not found: {}", name.display()))
        })
    }
}

impl Converter for SickbeardConverter {
    fn convert(&self, source: &Path) -> Result<PathBuf> {
        if !source.exists() {
            return Err(ReelError::input_missing(format!(
                "source file not found: {}",
                source.display()
            )));
        }
        if !self.script.exists() {
            return Err(ReelError::input_missing(format!(
                "converter script not found: {}",
                self.script.display()
            )));
        }

        let python = self.resolve_python()?;
        log::info!("Converting {}", source.display());

        let output = Command::new(&python)
            .arg(&self.script)
            .arg("-i")
            .arg(source)
            .arg("-a")
            .output()
            .map_err(|e| {
                ReelError::input_missing(format!("failed to execute {}: {}", python.display(), e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ReelError::conversion_failed(format!(
                "{} exited with {}: {}",
                source.display(),
                output.status,
                stderr.trim()
            )));
        }

        let converted = Self::output_path(source);
        if !converted.exists() {
            return Err(ReelError::conversion_failed(format!(
                "converter reported success but {} does not exist",
                converted.display()
            )));
        }

        log::info!("Converted {} -> {}", source.display(), converted.display());
        Ok(converted)
    }
}
