use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::error::{ReelError, Result};

/// One row of the library-selection table: media under `path` belongs to section `id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryEntry {
    pub path: String,
    pub id: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Rclone remotes used in round-robin order
    #[serde(default)]
    pub remotes: Vec<String>,

    #[serde(default)]
    pub plex_server: String,
    #[serde(default)]
    pub plex_token: String,

    /// Trigger files written by the download managers
    #[serde(default)]
    pub sonarr_data: PathBuf,
    #[serde(default)]
    pub radarr_data: PathBuf,
    #[serde(default)]
    pub uhd_radarr_data: PathBuf,

    #[serde(default)]
    pub radarr_url: String,
    #[serde(default)]
    pub radarr_api: String,
    #[serde(default)]
    pub uhd_radarr_url: String,
    #[serde(default)]
    pub uhd_radarr_api: String,

    #[serde(default)]
    pub sickbeard_path: PathBuf,
    #[serde(default)]
    pub python_path: PathBuf,

    #[serde(default)]
    pub rclone_path: PathBuf,
    /// JSON file holding the rotation index
    #[serde(default)]
    pub rclone_state: PathBuf,
    /// Prefix of the dated rclone log file
    #[serde(default)]
    pub rclone_log_file: String,

    #[serde(default)]
    pub tmdb_api: String,
    #[serde(default)]
    pub omdb_api: String,

    /// Local media root
    #[serde(default)]
    pub base_path: String,
    /// The same root as seen by the media server
    #[serde(default)]
    pub plex_base_path: String,
    /// Standard movie sub-root, relative to `base_path`
    #[serde(default)]
    pub movie_base_path: String,
    /// UHD movie sub-root, relative to `base_path`
    #[serde(default)]
    pub uhd_base_path: String,

    #[serde(default = "default_threads")]
    pub threads: usize,

    #[serde(default)]
    pub libraries: Vec<LibraryEntry>,
    /// Sections scanned when refreshing the library cache (defaults to every library id)
    #[serde(default)]
    pub movie_sections: Option<Vec<u32>>,

    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    #[serde(default)]
    pub poll_interval_ms: Option<u64>,
    #[serde(default)]
    pub queue_capacity: Option<usize>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_threads() -> usize {
    4
}

impl Config {
    /// Load the config from the default location
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ReelError::config(format!(
                "config file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)?;
        let config = Self::from_toml(&content)
            .map_err(|e| ReelError::config(format!("{}: {}", path.display(), e)))?;

        log::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| ReelError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ReelError::config("Could not determine config directory"))?;

        Ok(config_dir.join("reelroute").join("config.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.remotes.is_empty() {
            return Err(ReelError::config("at least one remote is required"));
        }
        if self.threads == 0 {
            return Err(ReelError::config("threads must be greater than zero"));
        }
        if self.base_path.is_empty() {
            return Err(ReelError::config("base_path must be set"));
        }
        if self.plex_base_path.is_empty() {
            return Err(ReelError::config("plex_base_path must be set"));
        }
        for (key, value) in [
            ("plex_server", &self.plex_server),
            ("radarr_url", &self.radarr_url),
            ("uhd_radarr_url", &self.uhd_radarr_url),
        ] {
            if !value.is_empty() {
                validate_service_url(key, value)?;
            }
        }
        Ok(())
    }

    /// Directory holding the persisted library snapshots
    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.cache_dir {
            return Ok(dir.clone());
        }
        let data_dir = dirs::data_dir()
            .ok_or_else(|| ReelError::config("Could not determine data directory"))?;
        Ok(data_dir.join("reelroute"))
    }

    pub fn movie_sections(&self) -> Vec<u32> {
        match &self.movie_sections {
            Some(sections) => sections.clone(),
            None => {
                let mut ids: Vec<u32> = Vec::new();
                for library in &self.libraries {
                    if !ids.contains(&library.id) {
                        ids.push(library.id);
                    }
                }
                ids
            }
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.unwrap_or(1000))
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity.unwrap_or(self.threads * 4).max(1)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(30))
    }
}

/// Service endpoints must be absolute http(s) URLs with a host
fn validate_service_url(key: &str, value: &str) -> Result<()> {
    let url = Url::parse(value)
        .map_err(|e| ReelError::config(format!("{} is not a valid URL: {}", key, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ReelError::config(format!(
            "{} must use http or https, got: {}",
            key,
            url.scheme()
        )));
    }
    if url.host_str().is_none() {
        return Err(ReelError::config(format!("{} has no hostname", key)));
    }
    Ok(())
}
