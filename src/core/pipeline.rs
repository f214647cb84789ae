//! End-to-end processing of one work item.
//!
//! Episodes: convert, upload, notify the media server.
//! Movies: drop from the download manager, convert, refresh the library
//! index, aggregate metadata, classify, relocate, upload, notify.
//!
//! Conversion, metadata, cache and move failures abort the item. Upload and
//! notify failures are logged and the item still completes: the file is
//! already in its final local place by then.

use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::classifier::{ClassificationEngine, RouteRoots};
use crate::core::config::{Config, LibraryEntry};
use crate::core::converter::{Converter, SickbeardConverter};
use crate::core::download_manager::{DownloadManager, RadarrClient};
use crate::core::library::{select_library, to_server_path, LibraryIndexCache, MediaServer, PlexServer};
use crate::core::metadata::{MetadataAggregator, OmdbClient, TmdbClient};
use crate::core::relocate::relocate;
use crate::core::rotation::RemoteRotation;
use crate::core::transfer::RcloneTransfer;
use crate::core::upload::UploadDispatcher;
use crate::core::work::{EpisodeEvent, MovieEvent, WorkItem};
use crate::core::worker::ItemHandler;
use crate::error::{ReelError, Result};

/// The external systems a pipeline talks to
pub struct Collaborators {
    pub converter: Arc<dyn Converter>,
    pub uploader: UploadDispatcher,
    pub server: Arc<dyn MediaServer>,
    pub metadata: MetadataAggregator,
    pub downloads: Arc<dyn DownloadManager>,
    pub uhd_downloads: Arc<dyn DownloadManager>,
}

impl Collaborators {
    /// Real clients for every collaborator
    pub fn from_config(config: &Config) -> Result<Self> {
        let timeout = config.request_timeout();

        let rotation = Arc::new(RemoteRotation::load(
            config.remotes.clone(),
            config.rclone_state.clone(),
        )?);
        let transfer = RcloneTransfer::new(config.rclone_path.clone())
            .with_log_prefix(config.rclone_log_file.clone());

        let metadata = MetadataAggregator::new(
            Arc::new(TmdbClient::new(config.tmdb_api.clone(), timeout)?),
            Arc::new(OmdbClient::new(config.omdb_api.clone(), timeout)?),
        );

        Ok(Self {
            converter: Arc::new(SickbeardConverter::new(
                config.python_path.clone(),
                config.sickbeard_path.clone(),
            )),
            uploader: UploadDispatcher::new(rotation, Arc::new(transfer)),
            server: Arc::new(PlexServer::new(
                config.plex_server.clone(),
                config.plex_token.clone(),
                timeout,
            )?),
            metadata,
            downloads: Arc::new(RadarrClient::new(
                config.radarr_url.clone(),
                config.radarr_api.clone(),
            )?),
            uhd_downloads: Arc::new(RadarrClient::new(
                config.uhd_radarr_url.clone(),
                config.uhd_radarr_api.clone(),
            )?),
        })
    }
}

pub struct Pipeline {
    local_base: String,
    server_base: String,
    libraries: Vec<LibraryEntry>,
    cache_dir: PathBuf,
    sections: Vec<u32>,
    // Loaded on first use and retried on failure so a corrupt snapshot only
    // fails the items that need it
    cache: Mutex<Option<Arc<LibraryIndexCache>>>,
    classifier: ClassificationEngine,
    parts: Collaborators,
}

impl Pipeline {
    pub fn new(config: &Config, parts: Collaborators) -> Result<Self> {
        Ok(Self {
            local_base: config.base_path.clone(),
            server_base: config.plex_base_path.clone(),
            libraries: config.libraries.clone(),
            cache_dir: config.cache_dir()?,
            sections: config.movie_sections(),
            cache: Mutex::new(None),
            classifier: ClassificationEngine::new(RouteRoots::from_config(config)),
            parts,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config, Collaborators::from_config(config)?)
    }

    /// The shared library index, loading it from disk if needed
    pub fn library_cache(&self) -> Result<Arc<LibraryIndexCache>> {
        let mut slot = self.cache.lock();
        if let Some(cache) = slot.as_ref() {
            return Ok(Arc::clone(cache));
        }

        let cache = Arc::new(LibraryIndexCache::load(
            self.cache_dir.clone(),
            self.sections.clone(),
        )?);
        *slot = Some(Arc::clone(&cache));
        Ok(cache)
    }

    fn process_episode(&self, event: &EpisodeEvent) -> Result<()> {
        let source = self.local_path(&event.episode_path);
        let converted = self.parts.converter.convert(&source)?;

        self.upload(&converted);
        self.notify(&converted);
        Ok(())
    }

    fn process_movie(&self, event: &MovieEvent, uhd: bool) -> Result<()> {
        let downloads = if uhd {
            &self.parts.uhd_downloads
        } else {
            &self.parts.downloads
        };
        if let Err(e) = downloads.remove_and_exclude(event.movie_id) {
            log::warn!("Could not remove movie {} from the download manager: {}", event.movie_id, e);
        }

        let source = self.local_path(&event.movie_path);
        let converted = self.parts.converter.convert(&source)?;

        let cache = self.library_cache()?;
        if let Err(e) = cache.refresh(self.parts.server.as_ref()) {
            log::warn!("Library refresh failed, classifying against the cached index: {}", e);
        }

        let record = self
            .parts
            .metadata
            .aggregate(event.tmdb_id, event.imdb_id.as_deref())?;
        let destination = self
            .classifier
            .classify(&record, &*cache, uhd, &converted)?;
        log::info!(
            "Routing {} to {} via {}",
            record.display_name,
            destination.path.display(),
            destination.describe()
        );

        relocate(&converted, &destination.path)?;

        self.upload(&destination.path);
        self.notify(&destination.path);
        Ok(())
    }

    fn local_path(&self, relative: &str) -> PathBuf {
        Path::new(&self.local_base).join(relative.trim_start_matches('/'))
    }

    fn upload(&self, local_file: &Path) {
        let base = Path::new(&self.local_base);
        if let Err(e) = self.parts.uploader.dispatch_next(local_file, base) {
            log::error!("Upload of {} failed [{}]: {}", local_file.display(), e.kind(), e);
        }
    }

    fn notify(&self, local_file: &Path) {
        if let Err(e) = self.try_notify(local_file) {
            log::warn!("Media server not notified for {}: {}", local_file.display(), e);
        }
    }

    /// Ask the media server to rescan the directory holding `local_file`.
    /// Plex scans folders, so the parent directory is sent, not the file.
    fn try_notify(&self, local_file: &Path) -> Result<()> {
        let local_dir = local_file
            .parent()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_default();
        let server_dir = to_server_path(&local_dir, &self.local_base, &self.server_base)
            .ok_or_else(|| {
                ReelError::notify_failed(format!("{} is outside {}", local_dir, self.local_base))
            })?;

        let section = select_library(&server_dir, &self.libraries).ok_or_else(|| {
            ReelError::notify_failed(format!("no library configured for {}", server_dir))
        })?;

        self.parts.server.update(section, &server_dir)?;
        log::debug!("Notified library {} for {}", section, server_dir);
        Ok(())
    }
}

impl ItemHandler for Pipeline {
    fn handle(&self, item: &WorkItem) -> Result<()> {
        match item {
            WorkItem::Episode(event) => self.process_episode(event),
            WorkItem::Movie { event, uhd } => self.process_movie(event, *uhd),
        }
    }
}
