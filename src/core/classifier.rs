//! Destination routing for movies.
//!
//! Rules are evaluated in strict priority order and the first match wins:
//!
//! 1. the movie's collection already exists in the library
//! 2. a movie with the same title already exists in the library
//! 3. no genres at all -> unknown bucket (separate for UHD)
//! 4. Marvel / DC production company
//! 5. Philippine production country or Tagalog spoken language
//! 6. genre buckets
//!
//! Rules 1 and 2 anchor the destination to the existing on-disk location,
//! translated from the media server's path prefix to the local one.

use std::path::{Path, PathBuf};

use crate::core::config::Config;
use crate::core::library::{to_local_path, LibraryLookup};
use crate::core::metadata::NormalizedMovieRecord;
use crate::error::{ReelError, Result};

pub const UNKNOWN_BUCKET: &str = "unknown";
pub const UHD_UNKNOWN_BUCKET: &str = "uhd_unknown";
pub const STUDIO_BUCKET: &str = "Marvel and DC";
pub const REGION_BUCKET: &str = "Filipino";
pub const TV_MOVIE_BUCKET: &str = "TV Movie";

const STUDIO_COMPANIES: [&str; 3] = ["Marvel Studios", "DC Films", "DC Studios"];
const REGION_COUNTRY: &str = "Philippines";
const REGION_LANGUAGE: &str = "Tagalog";
const TV_MOVIE_GENRE: &str = "TV Movie";

/// Which rule produced a destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    ExistingCollection,
    ExistingTitle,
    Bucket(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub route: Route,
    pub path: PathBuf,
}

impl Destination {
    pub fn bucket(&self) -> Option<&str> {
        match &self.route {
            Route::Bucket(name) => Some(name.as_str()),
            _ => None,
        }
    }

    pub fn describe(&self) -> String {
        match &self.route {
            Route::ExistingCollection => "existing collection".to_string(),
            Route::ExistingTitle => "existing title".to_string(),
            Route::Bucket(name) => format!("bucket '{}'", name),
        }
    }
}

/// Roots every destination is built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRoots {
    /// Local media root
    pub local_base: String,
    /// The same root as the media server sees it
    pub server_base: String,
    /// Standard movie sub-root under `local_base`
    pub movie_root: String,
    /// UHD movie sub-root under `local_base`
    pub uhd_root: String,
}

impl RouteRoots {
    pub fn from_config(config: &Config) -> Self {
        Self {
            local_base: config.base_path.clone(),
            server_base: config.plex_base_path.clone(),
            movie_root: config.movie_base_path.clone(),
            uhd_root: config.uhd_base_path.clone(),
        }
    }
}

pub struct ClassificationEngine {
    roots: RouteRoots,
}

impl ClassificationEngine {
    pub fn new(roots: RouteRoots) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &RouteRoots {
        &self.roots
    }

    /// Compute where `current_file` should live.
    ///
    /// Deterministic for a given record, library state and UHD flag; only the
    /// file name of `current_file` is used.
    pub fn classify(
        &self,
        record: &NormalizedMovieRecord,
        library: &dyn LibraryLookup,
        is_uhd: bool,
        current_file: &Path,
    ) -> Result<Destination> {
        let file_name = current_file.file_name().ok_or_else(|| {
            ReelError::input_missing(format!("{} has no file name", current_file.display()))
        })?;

        if let Some(collection) = record.collection_name.as_deref() {
            if let Some(dir) = library
                .find_collection(collection)
                .and_then(|existing| self.localize(&existing))
            {
                return Ok(Destination {
                    route: Route::ExistingCollection,
                    path: dir.join(sanitize_segment(&record.display_name)).join(file_name),
                });
            }
        }

        if let Some(dir) = library
            .find_movie(&record.title)
            .and_then(|existing| self.localize(&existing))
        {
            return Ok(Destination {
                route: Route::ExistingTitle,
                path: dir.join(file_name),
            });
        }

        let bucket = choose_bucket(record, is_uhd);
        let sub_root = if is_uhd {
            &self.roots.uhd_root
        } else {
            &self.roots.movie_root
        };

        let mut path = PathBuf::from(&self.roots.local_base);
        if !sub_root.is_empty() {
            path.push(sub_root);
        }
        path.push(sanitize_segment(&bucket));
        if let Some(collection) = record.collection_name.as_deref() {
            path.push(sanitize_segment(collection));
        }
        path.push(sanitize_segment(&record.display_name));
        path.push(file_name);

        Ok(Destination {
            route: Route::Bucket(bucket),
            path,
        })
    }

    /// Local directory for a cached server path. A path outside the server
    /// base cannot be reached from here, so the rule is skipped.
    fn localize(&self, server_path: &str) -> Option<PathBuf> {
        let local = to_local_path(server_path, &self.roots.server_base, &self.roots.local_base);
        if local.is_none() {
            log::warn!(
                "Library path {} is outside {}, ignoring it",
                server_path,
                self.roots.server_base
            );
        }
        local.map(PathBuf::from)
    }
}

/// Bucket for a movie with no existing library location (rules 3 to 6)
pub fn choose_bucket(record: &NormalizedMovieRecord, is_uhd: bool) -> String {
    let genres = &record.genres;

    if genres.is_empty() {
        let bucket = if is_uhd {
            UHD_UNKNOWN_BUCKET
        } else {
            UNKNOWN_BUCKET
        };
        return bucket.to_string();
    }

    if STUDIO_COMPANIES
        .iter()
        .any(|company| record.production_companies.contains(*company))
    {
        return STUDIO_BUCKET.to_string();
    }

    if record.production_countries.iter().any(|c| c == REGION_COUNTRY)
        || record.spoken_languages.iter().any(|l| l == REGION_LANGUAGE)
    {
        return REGION_BUCKET.to_string();
    }

    genre_bucket(genres)
}

fn genre_bucket(genres: &[String]) -> String {
    let has = |name: &str| genres.iter().any(|g| g == name);

    if genres[0] == TV_MOVIE_GENRE {
        return match genres.get(1) {
            Some(second) if second != TV_MOVIE_GENRE => second.clone(),
            _ => TV_MOVIE_BUCKET.to_string(),
        };
    }

    if has("Horror") {
        "Horror".to_string()
    } else if has("Animation") {
        "Animated".to_string()
    } else if has("Science Fiction") {
        "SciFi".to_string()
    } else if has("Comedy") && has("Romance") {
        "RomCom".to_string()
    } else {
        genres[0].clone()
    }
}

/// Make a metadata string safe to use as a single path component
pub fn sanitize_segment(segment: &str) -> String {
    segment
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '-',
            other => other,
        })
        .collect::<String>()
        .trim()
        .to_string()
}
