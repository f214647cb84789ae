use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::sync::Arc;

use crate::core::library::LibraryIndexCache;
use crate::core::metadata::{MetadataAggregator, OmdbClient, TmdbClient};
use crate::core::{ClassificationEngine, Config, PlexServer, RouteRoots};

/// Print where a movie would be routed without touching any file
pub fn execute(matches: &clap::ArgMatches, config: &Config) -> Result<()> {
    let tmdb_id = *matches
        .get_one::<u64>("tmdb")
        .context("--tmdb is required")?;
    let imdb_id = matches.get_one::<String>("imdb").map(|s| s.as_str());
    let is_uhd = matches.get_flag("uhd");
    let offline = matches.get_flag("offline");
    let file = matches
        .get_one::<String>("file")
        .map(|s| s.as_str())
        .unwrap_or("movie.m4v");

    let cache = LibraryIndexCache::load(config.cache_dir()?, config.movie_sections())
        .context("Failed to load the library cache")?;
    if !offline {
        let server = PlexServer::new(
            config.plex_server.clone(),
            config.plex_token.clone(),
            config.request_timeout(),
        )?;
        if let Err(e) = cache.refresh(&server) {
            println!(
                "{}",
                format!("Warning: library refresh failed, using cached index: {}", e).yellow()
            );
        }
    }

    let timeout = config.request_timeout();
    let aggregator = MetadataAggregator::new(
        Arc::new(TmdbClient::new(config.tmdb_api.clone(), timeout)?),
        Arc::new(OmdbClient::new(config.omdb_api.clone(), timeout)?),
    );
    let record = aggregator.aggregate(tmdb_id, imdb_id)?;

    let engine = ClassificationEngine::new(RouteRoots::from_config(config));
    let destination = engine.classify(&record, &cache, is_uhd, Path::new(file))?;

    println!("{} {}", "Title:".cyan(), record.display_name.bold());
    if let Some(collection) = &record.collection_name {
        println!("{} {}", "Collection:".cyan(), collection);
    }
    println!("{} {}", "Genres:".cyan(), record.genres.join(", "));
    println!("{} {}", "Route:".cyan(), destination.describe().yellow());
    println!("{} {}", "Destination:".cyan(), destination.path.display().to_string().green().bold());
    Ok(())
}
