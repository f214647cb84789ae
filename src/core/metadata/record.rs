use serde::Serialize;
use std::collections::BTreeSet;

/// Movie attributes after merging the primary and fallback sources.
///
/// Every collection is present even when empty; an empty `genres` list is
/// meaningful and routes the movie to the unknown bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizedMovieRecord {
    pub title: String,
    pub release_year: String,
    pub display_name: String,
    pub collection_name: Option<String>,
    pub production_companies: BTreeSet<String>,
    pub production_countries: Vec<String>,
    pub spoken_languages: Vec<String>,
    pub genres: Vec<String>,
}

impl NormalizedMovieRecord {
    pub fn new(title: impl Into<String>, release_year: impl Into<String>) -> Self {
        let title = title.into();
        let release_year = release_year.into();
        let display_name = display_name(&title, &release_year);
        Self {
            title,
            release_year,
            display_name,
            ..Default::default()
        }
    }

    pub fn with_collection(mut self, name: impl Into<String>) -> Self {
        self.collection_name = Some(name.into());
        self
    }

    pub fn with_companies<I, S>(mut self, companies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.production_companies = companies.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.production_countries = countries.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.spoken_languages = languages.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }
}

/// `"{title} ({year})"`, or just the title when no year is known
pub fn display_name(title: &str, year: &str) -> String {
    if year.is_empty() {
        title.to_string()
    } else {
        format!("{} ({})", title, year)
    }
}

/// Leading four-digit year of a `YYYY-MM-DD` release date
pub fn parse_release_year(release_date: &str) -> Option<String> {
    let year: String = release_date.chars().take(4).collect();
    if year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()) {
        Some(year)
    } else {
        None
    }
}
