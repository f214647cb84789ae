use serde::Deserialize;
use std::time::Duration;

use crate::error::{ReelError, Result};

const TMDB_API_BASE: &str = "https://api.themoviedb.org/3";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NamedEntry {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpokenLanguage {
    #[serde(default)]
    pub english_name: String,
    #[serde(default)]
    pub name: String,
}

/// Subset of a TMDB `/movie/{id}` response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieDetails {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub genres: Vec<NamedEntry>,
    #[serde(default)]
    pub production_companies: Vec<NamedEntry>,
    #[serde(default)]
    pub production_countries: Vec<NamedEntry>,
    #[serde(default)]
    pub spoken_languages: Vec<SpokenLanguage>,
    #[serde(default)]
    pub belongs_to_collection: Option<NamedEntry>,
}

/// Primary movie metadata source, keyed by TMDB id
pub trait PrimarySource: Send + Sync {
    fn get_details(&self, tmdb_id: u64) -> Result<MovieDetails>;
}

pub struct TmdbClient {
    client: reqwest::blocking::Client,
    api_key: String,
    base_url: String,
}

impl TmdbClient {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("reelroute/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: TMDB_API_BASE.to_string(),
        })
    }
}

impl PrimarySource for TmdbClient {
    fn get_details(&self, tmdb_id: u64) -> Result<MovieDetails> {
        let url = format!("{}/movie/{}", self.base_url, tmdb_id);
        log::debug!("TMDB lookup {}", tmdb_id);

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .send()?;

        if !response.status().is_success() {
            return Err(ReelError::metadata_unavailable(format!(
                "TMDB returned HTTP {} for movie {}",
                response.status(),
                tmdb_id
            )));
        }

        Ok(response.json()?)
    }
}
