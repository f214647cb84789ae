use std::sync::Arc;

use super::omdb::{OmdbRecord, SecondarySource};
use super::record::{display_name, parse_release_year, NormalizedMovieRecord};
use super::tmdb::{MovieDetails, PrimarySource};
use crate::error::{ReelError, Result};

/// Merges the primary source with the fallback into a [`NormalizedMovieRecord`].
///
/// Each list attribute comes wholly from one source: the primary value when it
/// is non-empty, otherwise the fallback value. The fallback is queried at most
/// once per movie and only when some attribute is missing.
pub struct MetadataAggregator {
    primary: Arc<dyn PrimarySource>,
    secondary: Arc<dyn SecondarySource>,
}

impl MetadataAggregator {
    pub fn new(primary: Arc<dyn PrimarySource>, secondary: Arc<dyn SecondarySource>) -> Self {
        Self { primary, secondary }
    }

    pub fn aggregate(&self, tmdb_id: u64, imdb_id: Option<&str>) -> Result<NormalizedMovieRecord> {
        let details = self.primary.get_details(tmdb_id).map_err(|e| match e {
            ReelError::MetadataUnavailable(_) => e,
            other => ReelError::metadata_unavailable(format!("movie {}: {}", tmdb_id, other)),
        })?;

        let fallback = if needs_fallback(&details) {
            self.fetch_fallback(imdb_id)
        } else {
            None
        };

        Ok(merge(&details, fallback.as_ref()))
    }

    fn fetch_fallback(&self, imdb_id: Option<&str>) -> Option<OmdbRecord> {
        let imdb_id = imdb_id.map(str::trim).filter(|id| !id.is_empty())?;

        match self.secondary.lookup(imdb_id) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("Fallback metadata lookup for {} failed: {}", imdb_id, e);
                None
            }
        }
    }
}

fn needs_fallback(details: &MovieDetails) -> bool {
    details.production_companies.is_empty()
        || details.production_countries.is_empty()
        || details.spoken_languages.is_empty()
        || details.genres.is_empty()
}

fn merge(details: &MovieDetails, fallback: Option<&OmdbRecord>) -> NormalizedMovieRecord {
    let title = match details.original_title.as_deref() {
        Some(original) if !original.trim().is_empty() => original.to_string(),
        _ => details.title.clone(),
    };

    let release_year = details
        .release_date
        .as_deref()
        .and_then(parse_release_year)
        .unwrap_or_default();

    let companies: Vec<String> = details
        .production_companies
        .iter()
        .map(|c| c.name.clone())
        .collect();
    let countries: Vec<String> = details
        .production_countries
        .iter()
        .map(|c| c.name.clone())
        .collect();
    let languages: Vec<String> = details
        .spoken_languages
        .iter()
        .map(|l| l.english_name.clone())
        .collect();
    let genres: Vec<String> = details.genres.iter().map(|g| g.name.clone()).collect();

    let pick = |primary: Vec<String>, alternative: fn(&OmdbRecord) -> Vec<String>| {
        if primary.is_empty() {
            fallback.map(alternative).unwrap_or_default()
        } else {
            primary
        }
    };

    NormalizedMovieRecord {
        display_name: display_name(&title, &release_year),
        title,
        release_year,
        collection_name: details
            .belongs_to_collection
            .as_ref()
            .map(|c| c.name.clone())
            .filter(|name| !name.is_empty()),
        production_companies: pick(companies, OmdbRecord::production_companies)
            .into_iter()
            .collect(),
        production_countries: pick(countries, OmdbRecord::countries),
        spoken_languages: pick(languages, OmdbRecord::languages),
        genres: pick(genres, OmdbRecord::genres),
    }
}
