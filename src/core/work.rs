use serde::{Deserialize, Deserializer};
use std::fmt;

/// A completed TV episode download
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EpisodeEvent {
    /// Path relative to the media base, usually with a leading `/`
    #[serde(rename = "episodepath", alias = "epidodepath")]
    pub episode_path: String,
}

/// A completed movie download
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MovieEvent {
    #[serde(rename = "movieid", deserialize_with = "number_or_string")]
    pub movie_id: u64,
    #[serde(rename = "moviepath")]
    pub movie_path: String,
    #[serde(rename = "tmdbid", deserialize_with = "number_or_string")]
    pub tmdb_id: u64,
    #[serde(rename = "imdbid", default)]
    pub imdb_id: Option<String>,
}

/// One unit of work for the pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkItem {
    Episode(EpisodeEvent),
    Movie { event: MovieEvent, uhd: bool },
}

impl fmt::Display for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkItem::Episode(event) => write!(f, "episode {}", event.episode_path),
            WorkItem::Movie { event, uhd } => write!(
                f,
                "{}movie {} (tmdb {})",
                if *uhd { "UHD " } else { "" },
                event.movie_path,
                event.tmdb_id
            ),
        }
    }
}

// The trigger scripts write ids either as JSON numbers or as strings
fn number_or_string<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
