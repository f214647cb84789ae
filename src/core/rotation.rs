//! Persisted round-robin selection of upload remotes.
//!
//! The index on disk always names the remote to use *next*. Claiming a remote
//! reads the index, computes the successor and persists it while holding a
//! single lock; the transfer itself runs after the lock is released, so a crash
//! mid-transfer leaves that remote's slot already consumed.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ReelError, Result};

#[derive(Debug, Serialize, Deserialize)]
struct PersistedIndex {
    index: usize,
}

/// The remote handed out by [`RemoteRotation::claim_next`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteClaim {
    pub remote: String,
    pub index: usize,
}

pub struct RemoteRotation {
    remotes: Vec<String>,
    state_file: PathBuf,
    index: Mutex<usize>,
}

impl RemoteRotation {
    /// Load the rotation from `state_file`, starting at 0 when the file is absent
    pub fn load(remotes: Vec<String>, state_file: impl Into<PathBuf>) -> Result<Self> {
        if remotes.is_empty() {
            return Err(ReelError::config("rotation needs at least one remote"));
        }

        let state_file = state_file.into();
        let stored = read_index(&state_file)?;
        let index = stored % remotes.len();
        if index != stored {
            log::warn!(
                "Stored rotation index {} out of range for {} remotes, wrapping to {}",
                stored,
                remotes.len(),
                index
            );
        }

        Ok(Self {
            remotes,
            state_file,
            index: Mutex::new(index),
        })
    }

    pub fn remotes(&self) -> &[String] {
        &self.remotes
    }

    /// Index of the remote the next claim will return
    pub fn current_index(&self) -> usize {
        *self.index.lock()
    }

    /// Choose the next remote and persist the advanced index before returning.
    ///
    /// If persisting fails the in-memory index is left untouched and the error
    /// is returned, so no remote is handed out without its slot being recorded.
    pub fn claim_next(&self) -> Result<RemoteClaim> {
        let mut guard = self.index.lock();
        let index = *guard;
        let remote = self.remotes[index].clone();
        let next = (index + 1) % self.remotes.len();

        write_index(&self.state_file, next)?;
        *guard = next;

        log::debug!("Rotation claimed remote {} ({}), next {}", remote, index, next);
        Ok(RemoteClaim { remote, index })
    }

    /// Put the rotation back at the first remote
    pub fn reset(&self) -> Result<()> {
        let mut guard = self.index.lock();
        write_index(&self.state_file, 0)?;
        *guard = 0;
        Ok(())
    }
}

fn read_index(path: &Path) -> Result<usize> {
    if !path.exists() {
        return Ok(0);
    }

    let data = fs::read_to_string(path)?;
    if data.trim().is_empty() {
        return Ok(0);
    }

    match serde_json::from_str::<PersistedIndex>(&data) {
        Ok(state) => Ok(state.index),
        Err(e) => {
            log::warn!(
                "Rotation state {:?} is unreadable ({}), starting from the first remote",
                path,
                e
            );
            Ok(0)
        }
    }
}

fn write_index(path: &Path, index: usize) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let data = serde_json::to_vec(&PersistedIndex { index })?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, data)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
