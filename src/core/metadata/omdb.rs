use serde::Deserialize;
use std::time::Duration;

use crate::error::{ReelError, Result};

const OMDB_API_BASE: &str = "http://www.omdbapi.com/";
const NOT_AVAILABLE: &str = "N/A";

/// Subset of an OMDb lookup; list fields are comma-joined strings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OmdbRecord {
    #[serde(rename = "Production", default)]
    pub production: Option<String>,
    #[serde(rename = "Country", default)]
    pub country: Option<String>,
    #[serde(rename = "Language", default)]
    pub language: Option<String>,
    #[serde(rename = "Genre", default)]
    pub genre: Option<String>,
}

impl OmdbRecord {
    pub fn production_companies(&self) -> Vec<String> {
        split_field(self.production.as_deref())
    }

    pub fn countries(&self) -> Vec<String> {
        split_field(self.country.as_deref())
    }

    pub fn languages(&self) -> Vec<String> {
        split_field(self.language.as_deref())
    }

    pub fn genres(&self) -> Vec<String> {
        split_field(self.genre.as_deref())
    }
}

/// Split a comma-joined OMDb field; absent and "N/A" both give an empty list
fn split_field(value: Option<&str>) -> Vec<String> {
    match value {
        Some(v) if v.trim() != NOT_AVAILABLE => v
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}

/// Fallback metadata source, keyed by IMDb id
pub trait SecondarySource: Send + Sync {
    fn lookup(&self, imdb_id: &str) -> Result<OmdbRecord>;
}

pub struct OmdbClient {
    client: reqwest::blocking::Client,
    api_key: String,
    base_url: String,
}

impl OmdbClient {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("reelroute/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: OMDB_API_BASE.to_string(),
        })
    }
}

impl SecondarySource for OmdbClient {
    fn lookup(&self, imdb_id: &str) -> Result<OmdbRecord> {
        log::debug!("OMDb lookup {}", imdb_id);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("apikey", self.api_key.as_str()), ("i", imdb_id)])
            .send()?;

        if !response.status().is_success() {
            return Err(ReelError::metadata_unavailable(format!(
                "OMDb returned HTTP {} for {}",
                response.status(),
                imdb_id
            )));
        }

        Ok(response.json()?)
    }
}
