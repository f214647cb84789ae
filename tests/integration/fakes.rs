// Test doubles for the pipeline's collaborators

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use reelroute::core::converter::{Converter, SickbeardConverter};
use reelroute::core::download_manager::DownloadManager;
use reelroute::core::library::{MediaServer, ServerMovie};
use reelroute::core::metadata::{MovieDetails, OmdbRecord, PrimarySource, SecondarySource};
use reelroute::core::transfer::Transfer;
use reelroute::{ReelError, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// In-memory media server; every section shares the same content
#[derive(Default)]
pub struct FakeServer {
    pub movies: Mutex<Vec<ServerMovie>>,
    pub collections: Mutex<Vec<String>>,
    pub offline: Mutex<bool>,
    pub calls: Mutex<HashMap<&'static str, usize>>,
    pub updates: Mutex<Vec<(u32, String)>>,
}

impl FakeServer {
    pub fn add_movie(&self, title: &str, path: &str, added_at: i64) {
        self.movies.lock().push(ServerMovie {
            title: title.to_string(),
            path: path.to_string(),
            added_at,
        });
    }

    fn count(&self, call: &'static str) {
        *self.calls.lock().entry(call).or_default() += 1;
    }

    fn check_online(&self) -> Result<()> {
        if *self.offline.lock() {
            return Err(ReelError::media_server("connection refused"));
        }
        Ok(())
    }
}

impl MediaServer for FakeServer {
    fn section_locations(&self, _section: u32) -> Result<Vec<String>> {
        self.check_online()?;
        Ok(vec!["/data/Movies".to_string()])
    }

    fn movies_added_after(&self, _section: u32, since: DateTime<Utc>) -> Result<Vec<ServerMovie>> {
        self.check_online()?;
        self.count("movies");
        Ok(self
            .movies
            .lock()
            .iter()
            .filter(|m| m.added_at > since.timestamp())
            .cloned()
            .collect())
    }

    fn collections(&self, _section: u32) -> Result<Vec<String>> {
        self.check_online()?;
        self.count("collections");
        Ok(self.collections.lock().clone())
    }

    fn update(&self, section: u32, sub_path: &str) -> Result<()> {
        self.check_online()?;
        self.updates.lock().push((section, sub_path.to_string()));
        Ok(())
    }
}

/// Copies the source next to itself with the converted extension
pub struct CopyConverter;

impl Converter for CopyConverter {
    fn convert(&self, source: &Path) -> Result<PathBuf> {
        if !source.exists() {
            return Err(ReelError::input_missing(format!("{} not found", source.display())));
        }
        let output = SickbeardConverter::output_path(source);
        fs::copy(source, &output)
            .map_err(|e| ReelError::conversion_failed(e.to_string()))?;
        fs::remove_file(source)?;
        Ok(output)
    }
}

/// Records every move and answers with a fixed exit code
pub struct RecordingTransfer {
    pub exit_code: i32,
    pub moves: Mutex<Vec<(PathBuf, String)>>,
}

impl RecordingTransfer {
    pub fn new(exit_code: i32) -> Self {
        Self {
            exit_code,
            moves: Mutex::new(Vec::new()),
        }
    }
}

impl Transfer for RecordingTransfer {
    fn move_to(&self, local_path: &Path, remote_destination: &str) -> Result<i32> {
        self.moves
            .lock()
            .push((local_path.to_path_buf(), remote_destination.to_string()));
        Ok(self.exit_code)
    }
}

/// Returns the same details for any id, or fails when `details` is None
pub struct FixedPrimary {
    pub details: Option<MovieDetails>,
}

impl PrimarySource for FixedPrimary {
    fn get_details(&self, tmdb_id: u64) -> Result<MovieDetails> {
        self.details
            .clone()
            .ok_or_else(|| ReelError::metadata_unavailable(format!("movie {} not found", tmdb_id)))
    }
}

pub struct UnreachableSecondary;

impl SecondarySource for UnreachableSecondary {
    fn lookup(&self, imdb_id: &str) -> Result<OmdbRecord> {
        Err(ReelError::metadata_unavailable(format!("{} lookup timed out", imdb_id)))
    }
}

#[derive(Default)]
pub struct RecordingDownloads {
    pub removed: Mutex<Vec<u64>>,
}

impl DownloadManager for RecordingDownloads {
    fn remove_and_exclude(&self, item_id: u64) -> Result<()> {
        self.removed.lock().push(item_id);
        Ok(())
    }
}
