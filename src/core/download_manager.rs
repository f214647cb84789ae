use std::time::Duration;

use crate::error::{ReelError, Result};

/// Radarr deletion calls are expected to answer quickly
pub const REMOVE_TIMEOUT: Duration = Duration::from_secs(5);

/// Removes completed items from the download manager and blocks re-adding them
pub trait DownloadManager: Send + Sync {
    /// Removing an item that is already gone is not an error
    fn remove_and_exclude(&self, item_id: u64) -> Result<()>;
}

pub struct RadarrClient {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
}

impl RadarrClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("reelroute/", env!("CARGO_PKG_VERSION")))
            .timeout(REMOVE_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn movie_url(&self, item_id: u64) -> String {
        format!("{}/api/v3/movie/{}", self.base_url, item_id)
    }
}

impl DownloadManager for RadarrClient {
    fn remove_and_exclude(&self, item_id: u64) -> Result<()> {
        let response = self
            .client
            .delete(self.movie_url(item_id))
            .header("X-Api-Key", &self.api_key)
            .query(&[("deleteFiles", "false"), ("addImportExclusion", "true")])
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    ReelError::download_manager(format!(
                        "no response within {} seconds removing movie {}",
                        REMOVE_TIMEOUT.as_secs(),
                        item_id
                    ))
                } else {
                    ReelError::Http(e)
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            log::debug!("Movie {} already removed from Radarr", item_id);
            return Ok(());
        }
        if !status.is_success() {
            return Err(ReelError::download_manager(format!(
                "removing movie {} returned HTTP {}",
                item_id, status
            )));
        }

        log::info!("Removed movie {} from Radarr and excluded it", item_id);
        Ok(())
    }
}
