use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::error::{ReelError, Result};

/// A movie as reported by the media server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerMovie {
    pub title: String,
    /// Server-visible directory holding the movie's first file
    pub path: String,
    pub added_at: i64,
}

/// Library operations the pipeline needs from the media server
pub trait MediaServer: Send + Sync {
    /// Root folders of a library section
    fn section_locations(&self, section: u32) -> Result<Vec<String>>;

    fn movies_added_after(&self, section: u32, since: DateTime<Utc>) -> Result<Vec<ServerMovie>>;

    /// Names of every collection in the section
    fn collections(&self, section: u32) -> Result<Vec<String>>;

    /// Trigger a partial rescan of `sub_path`
    fn update(&self, section: u32, sub_path: &str) -> Result<()>;
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(rename = "MediaContainer")]
    container: T,
}

#[derive(Debug, Default, Deserialize)]
struct SectionsContainer {
    #[serde(rename = "Directory", default)]
    directories: Vec<SectionDirectory>,
}

#[derive(Debug, Deserialize)]
struct SectionDirectory {
    key: String,
    #[serde(rename = "Location", default)]
    locations: Vec<SectionLocation>,
}

#[derive(Debug, Deserialize)]
struct SectionLocation {
    path: String,
}

#[derive(Debug, Default, Deserialize)]
struct MetadataContainer {
    #[serde(rename = "Metadata", default)]
    metadata: Vec<MetadataItem>,
}

#[derive(Debug, Deserialize)]
struct MetadataItem {
    #[serde(default)]
    title: String,
    #[serde(rename = "addedAt", default)]
    added_at: i64,
    #[serde(rename = "Media", default)]
    media: Vec<MediaItem>,
}

#[derive(Debug, Deserialize)]
struct MediaItem {
    #[serde(rename = "Part", default)]
    parts: Vec<MediaPart>,
}

#[derive(Debug, Deserialize)]
struct MediaPart {
    file: String,
}

impl MetadataItem {
    fn first_location(&self) -> Option<&str> {
        self.media
            .iter()
            .flat_map(|m| m.parts.iter())
            .map(|p| p.file.as_str())
            .next()
    }
}

/// Plex Media Server over its HTTP API
pub struct PlexServer {
    client: reqwest::blocking::Client,
    base_url: String,
    token: String,
}

impl PlexServer {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("reelroute/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<reqwest::blocking::Response> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .header("X-Plex-Token", &self.token)
            .query(query)
            .send()?;

        if !response.status().is_success() {
            return Err(ReelError::media_server(format!(
                "GET {} returned HTTP {}",
                path,
                response.status()
            )));
        }
        Ok(response)
    }
}

impl MediaServer for PlexServer {
    fn section_locations(&self, section: u32) -> Result<Vec<String>> {
        let envelope: Envelope<SectionsContainer> = self.get("/library/sections", &[])?.json()?;
        let key = section.to_string();

        envelope
            .container
            .directories
            .into_iter()
            .find(|d| d.key == key)
            .map(|d| d.locations.into_iter().map(|l| l.path).collect())
            .ok_or_else(|| ReelError::media_server(format!("library section {} not found", section)))
    }

    fn movies_added_after(&self, section: u32, since: DateTime<Utc>) -> Result<Vec<ServerMovie>> {
        let path = format!("/library/sections/{}/all", section);
        let query = [
            ("type", "1".to_string()),
            ("addedAt>>", since.timestamp().to_string()),
        ];
        let envelope: Envelope<MetadataContainer> = self.get(&path, &query)?.json()?;

        let movies = envelope
            .container
            .metadata
            .into_iter()
            .filter_map(|item| {
                let dir = Path::new(item.first_location()?)
                    .parent()?
                    .to_string_lossy()
                    .to_string();
                Some(ServerMovie {
                    title: item.title,
                    path: dir,
                    added_at: item.added_at,
                })
            })
            .collect();
        Ok(movies)
    }

    fn collections(&self, section: u32) -> Result<Vec<String>> {
        let path = format!("/library/sections/{}/collections", section);
        let envelope: Envelope<MetadataContainer> = self.get(&path, &[])?.json()?;
        Ok(envelope
            .container
            .metadata
            .into_iter()
            .map(|item| item.title)
            .collect())
    }

    fn update(&self, section: u32, sub_path: &str) -> Result<()> {
        let path = format!("/library/sections/{}/refresh", section);
        self.get(&path, &[("path", sub_path.to_string())])
            .map_err(|e| ReelError::notify_failed(format!("section {}: {}", section, e)))?;
        log::info!("Requested rescan of {} in section {}", sub_path, section);
        Ok(())
    }
}
