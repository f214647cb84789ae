//! Local snapshot of the media server's movies and collections.
//!
//! Two JSON files live in the cache directory:
//! - `movies_data.json`: `{"data": [movie entries], "last_updated": epoch_seconds}`
//! - `collections_data.json`: a bare list of collection entries
//!
//! Movies are pulled incrementally (only those added after the last refresh)
//! and merged by title; collections are re-listed in full on every refresh.

use chrono::{DateTime, TimeZone, Utc};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::server::MediaServer;
use crate::error::{ReelError, Result};

const MOVIES_FILE: &str = "movies_data.json";
const COLLECTIONS_FILE: &str = "collections_data.json";

/// Lower bound used when no snapshot exists yet, so the whole library is pulled
pub const FIRST_RUN_SINCE: i64 = 946_684_800; // 2000-01-01T00:00:00Z

/// Read access to previously organized library state
pub trait LibraryLookup {
    /// Server-visible directory of a movie already in the library
    fn find_movie(&self, title: &str) -> Option<String>;

    /// Server-visible directory of an existing collection
    fn find_collection(&self, name: &str) -> Option<String>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieEntry {
    pub title: String,
    pub path: String,
    #[serde(default)]
    pub added_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionEntry {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct MovieSnapshot {
    data: Vec<MovieEntry>,
    last_updated: i64,
}

#[derive(Debug, Default)]
struct CacheState {
    movies: HashMap<String, MovieEntry>,
    collections: HashMap<String, CollectionEntry>,
    last_refreshed: Option<DateTime<Utc>>,
}

/// Outcome of a refresh, for logging and the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RefreshSummary {
    pub movies_seen: usize,
    pub collections: usize,
    pub persisted: bool,
}

pub struct LibraryIndexCache {
    dir: PathBuf,
    sections: Vec<u32>,
    state: RwLock<CacheState>,
    // Serializes refreshes so a stale read never races a snapshot write
    refresh_lock: Mutex<()>,
}

impl LibraryIndexCache {
    /// Load persisted snapshots from `dir`; missing files give an empty cache
    pub fn load(dir: impl Into<PathBuf>, sections: Vec<u32>) -> Result<Self> {
        let dir = dir.into();
        let mut state = CacheState::default();

        let movies_path = dir.join(MOVIES_FILE);
        if movies_path.exists() {
            let snapshot: MovieSnapshot = read_json(&movies_path)?;
            for entry in snapshot.data {
                state.movies.insert(entry.title.clone(), entry);
            }
            state.last_refreshed = Utc.timestamp_opt(snapshot.last_updated, 0).single();
        }

        let collections_path = dir.join(COLLECTIONS_FILE);
        if collections_path.exists() {
            let entries: Vec<CollectionEntry> = read_json(&collections_path)?;
            for entry in entries {
                state.collections.entry(entry.name.clone()).or_insert(entry);
            }
        }

        log::debug!(
            "Library cache loaded from {:?}: {} movies, {} collections",
            dir,
            state.movies.len(),
            state.collections.len()
        );

        Ok(Self {
            dir,
            sections,
            state: RwLock::new(state),
            refresh_lock: Mutex::new(()),
        })
    }

    pub fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        self.state.read().last_refreshed
    }

    /// Lower bound for the next incremental refresh
    pub fn since(&self) -> DateTime<Utc> {
        self.last_refreshed().unwrap_or_else(first_run_since)
    }

    pub fn movie_count(&self) -> usize {
        self.state.read().movies.len()
    }

    pub fn collection_count(&self) -> usize {
        self.state.read().collections.len()
    }

    /// Refresh from the last refresh time (or the first-run epoch)
    pub fn refresh(&self, server: &dyn MediaServer) -> Result<RefreshSummary> {
        let _guard = self.refresh_lock.lock();
        let since = self.since();
        self.refresh_locked(server, since)
    }

    /// Refresh with an explicit lower bound for movie additions
    pub fn refresh_since(&self, server: &dyn MediaServer, since: DateTime<Utc>) -> Result<RefreshSummary> {
        let _guard = self.refresh_lock.lock();
        self.refresh_locked(server, since)
    }

    fn refresh_locked(&self, server: &dyn MediaServer, since: DateTime<Utc>) -> Result<RefreshSummary> {
        let started_at = Utc::now();
        let mut added: Vec<MovieEntry> = Vec::new();
        let mut collections: HashMap<String, CollectionEntry> = HashMap::new();

        // Query everything before touching state so a failed section leaves the cache as it was
        for &section in &self.sections {
            for movie in server.movies_added_after(section, since)? {
                added.push(MovieEntry {
                    title: movie.title,
                    path: movie.path,
                    added_at: movie.added_at,
                });
            }

            let names = server.collections(section)?;
            if names.is_empty() {
                continue;
            }

            let root = match server.section_locations(section)?.into_iter().next() {
                Some(root) => root,
                None => {
                    log::warn!("Section {} has no locations, skipping its collections", section);
                    continue;
                }
            };

            for name in names {
                let path = join_server_path(&root, &name);
                collections
                    .entry(name.clone())
                    .or_insert(CollectionEntry { name, path });
            }
        }

        let summary = {
            let mut state = self.state.write();
            let movies_seen = added.len();
            for entry in added {
                state.movies.insert(entry.title.clone(), entry);
            }
            state.collections = collections;
            state.last_refreshed = Some(started_at);

            RefreshSummary {
                movies_seen,
                collections: state.collections.len(),
                persisted: false,
            }
        };

        let persisted = match self.persist() {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Failed to persist library cache to {:?}: {}", self.dir, e);
                false
            }
        };

        log::info!(
            "Library cache refreshed since {}: {} new/updated movies, {} collections",
            since.format("%Y-%m-%d %H:%M:%S"),
            summary.movies_seen,
            summary.collections
        );

        Ok(RefreshSummary {
            persisted,
            ..summary
        })
    }

    fn persist(&self) -> Result<()> {
        let (snapshot, collections) = {
            let state = self.state.read();
            let mut movies: Vec<MovieEntry> = state.movies.values().cloned().collect();
            movies.sort_by(|a, b| a.title.cmp(&b.title));
            let mut collections: Vec<CollectionEntry> =
                state.collections.values().cloned().collect();
            collections.sort_by(|a, b| a.name.cmp(&b.name));

            let last_updated = state
                .last_refreshed
                .map(|t| t.timestamp())
                .unwrap_or(FIRST_RUN_SINCE);
            (
                MovieSnapshot {
                    data: movies,
                    last_updated,
                },
                collections,
            )
        };

        fs::create_dir_all(&self.dir)?;
        write_json(&self.dir.join(MOVIES_FILE), &snapshot)?;
        write_json(&self.dir.join(COLLECTIONS_FILE), &collections)?;
        Ok(())
    }
}

impl LibraryLookup for LibraryIndexCache {
    fn find_movie(&self, title: &str) -> Option<String> {
        self.state.read().movies.get(title).map(|m| m.path.clone())
    }

    fn find_collection(&self, name: &str) -> Option<String> {
        self.state
            .read()
            .collections
            .get(name)
            .map(|c| c.path.clone())
    }
}

/// Lower bound used when nothing has been refreshed yet
pub fn first_run_since() -> DateTime<Utc> {
    Utc.timestamp_opt(FIRST_RUN_SINCE, 0)
        .single()
        .unwrap_or_default()
}

fn join_server_path(root: &str, name: &str) -> String {
    format!("{}/{}", root.trim_end_matches(['/', '\\']), name)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read(path)
        .map_err(|e| ReelError::cache_unavailable(format!("{}: {}", path.display(), e)))?;
    serde_json::from_slice(&data)
        .map_err(|e| ReelError::cache_unavailable(format!("{}: {}", path.display(), e)))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let data = serde_json::to_vec_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, data)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
