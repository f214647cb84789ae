use anyhow::{Context, Result};
use colored::Colorize;

use crate::core::library::first_run_since;
use crate::core::{Config, LibraryIndexCache, PlexServer};

pub fn execute(matches: &clap::ArgMatches, config: &Config) -> Result<()> {
    let full = matches.get_flag("full");

    let server = PlexServer::new(
        config.plex_server.clone(),
        config.plex_token.clone(),
        config.request_timeout(),
    )?;
    let cache = LibraryIndexCache::load(config.cache_dir()?, config.movie_sections())
        .context("Failed to load the library cache")?;

    let since = if full { first_run_since() } else { cache.since() };
    println!(
        "{} {}",
        "Refreshing library index, movies added since".cyan(),
        since.format("%Y-%m-%d %H:%M:%S UTC").to_string().yellow()
    );

    let summary = cache.refresh_since(&server, since)?;

    println!(
        "  {} movie(s) seen, {} collection(s) indexed",
        summary.movies_seen.to_string().green().bold(),
        summary.collections.to_string().green().bold()
    );
    println!(
        "  {} movie(s) cached in total",
        cache.movie_count().to_string().bold()
    );
    if !summary.persisted {
        println!(
            "{}",
            "Warning: the snapshot could not be written; the next run starts from the old one"
                .yellow()
        );
    }
    Ok(())
}
