use chrono::Utc;
use reelroute::core::library::{LibraryIndexCache, LibraryLookup};
use reelroute::ReelError;
use std::fs;
use tempfile::TempDir;

use super::fakes::FakeServer;

#[test]
fn test_first_refresh_pulls_everything_and_persists() {
    let temp_dir = TempDir::new().unwrap();
    let server = FakeServer::default();
    server.add_movie("Heat", "/data/Movies/Crime/Heat (1995)", 1_000_000_000);
    server.collections.lock().push("Alien Collection".to_string());

    let cache = LibraryIndexCache::load(temp_dir.path(), vec![13]).unwrap();
    assert!(cache.last_refreshed().is_none());

    let summary = cache.refresh(&server).unwrap();
    assert_eq!(summary.movies_seen, 1);
    assert_eq!(summary.collections, 1);
    assert!(summary.persisted);

    assert_eq!(
        cache.find_movie("Heat").as_deref(),
        Some("/data/Movies/Crime/Heat (1995)")
    );
    assert_eq!(
        cache.find_collection("Alien Collection").as_deref(),
        Some("/data/Movies/Alien Collection")
    );

    let movies: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(temp_dir.path().join("movies_data.json")).unwrap())
            .unwrap();
    assert_eq!(movies["data"][0]["title"], "Heat");
    assert!(movies["last_updated"].as_i64().unwrap() > 0);
    assert!(temp_dir.path().join("collections_data.json").exists());
}

#[test]
fn test_refresh_twice_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let server = FakeServer::default();
    server.add_movie("Heat", "/data/Movies/Crime/Heat (1995)", 1_000_000_000);
    server.collections.lock().push("Alien Collection".to_string());

    let cache = LibraryIndexCache::load(temp_dir.path(), vec![13]).unwrap();
    cache.refresh(&server).unwrap();
    let second = cache.refresh(&server).unwrap();

    // The movie predates the first refresh, so the second one sees nothing new
    assert_eq!(second.movies_seen, 0);
    assert_eq!(cache.movie_count(), 1);
    assert_eq!(cache.collection_count(), 1);
    assert_eq!(*server.calls.lock().get("collections").unwrap(), 2);
}

#[test]
fn test_collections_are_relisted_in_full() {
    let temp_dir = TempDir::new().unwrap();
    let server = FakeServer::default();
    server.collections.lock().push("Old Collection".to_string());

    let cache = LibraryIndexCache::load(temp_dir.path(), vec![13]).unwrap();
    cache.refresh(&server).unwrap();

    *server.collections.lock() = vec!["New Collection".to_string()];
    cache.refresh(&server).unwrap();

    assert!(cache.find_collection("Old Collection").is_none());
    assert!(cache.find_collection("New Collection").is_some());
}

#[test]
fn test_snapshot_reloads_and_continues_incrementally() {
    let temp_dir = TempDir::new().unwrap();
    let server = FakeServer::default();
    server.add_movie("Heat", "/data/Movies/Crime/Heat (1995)", 1_000_000_000);

    {
        let cache = LibraryIndexCache::load(temp_dir.path(), vec![13]).unwrap();
        cache.refresh(&server).unwrap();
    }

    let reloaded = LibraryIndexCache::load(temp_dir.path(), vec![13]).unwrap();
    assert!(reloaded.last_refreshed().is_some());
    assert!(reloaded.find_movie("Heat").is_some());

    let summary = reloaded.refresh(&server).unwrap();
    assert_eq!(summary.movies_seen, 0);
}

#[test]
fn test_failed_refresh_leaves_cache_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let server = FakeServer::default();
    server.add_movie("Heat", "/data/Movies/Crime/Heat (1995)", 1_000_000_000);
    server.collections.lock().push("Alien Collection".to_string());

    let cache = LibraryIndexCache::load(temp_dir.path(), vec![13]).unwrap();
    cache.refresh(&server).unwrap();
    let before = cache.last_refreshed();

    *server.offline.lock() = true;
    assert!(cache.refresh(&server).is_err());

    assert_eq!(cache.last_refreshed(), before);
    assert!(cache.find_movie("Heat").is_some());
    assert!(cache.find_collection("Alien Collection").is_some());
}

#[test]
fn test_corrupt_snapshot_is_cache_unavailable() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("movies_data.json"), "{ not json").unwrap();

    let err = LibraryIndexCache::load(temp_dir.path(), vec![13]).err().unwrap();
    assert!(matches!(err, ReelError::CacheUnavailable(_)));
}

#[test]
fn test_redelivered_title_replaces_previous_entry() {
    let temp_dir = TempDir::new().unwrap();
    let server = FakeServer::default();
    server.add_movie("Heat", "/data/Movies/Crime/Heat (1995)", 1_000_000_000);

    let cache = LibraryIndexCache::load(temp_dir.path(), vec![13]).unwrap();
    cache.refresh(&server).unwrap();

    server.add_movie(
        "Heat",
        "/data/Movies/Classics/Heat (1995)",
        Utc::now().timestamp() + 3600,
    );
    let summary = cache.refresh(&server).unwrap();

    assert_eq!(summary.movies_seen, 1);
    assert_eq!(cache.movie_count(), 1);
    assert_eq!(
        cache.find_movie("Heat").as_deref(),
        Some("/data/Movies/Classics/Heat (1995)")
    );

    let movies: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(temp_dir.path().join("movies_data.json")).unwrap())
            .unwrap();
    let data = movies["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["title"], "Heat");
    assert_eq!(data[0]["path"], "/data/Movies/Classics/Heat (1995)");
}

#[test]
fn test_unwritable_cache_dir_keeps_refreshed_state_in_memory() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("not_a_dir");
    fs::write(&blocker, b"").unwrap();

    let server = FakeServer::default();
    server.add_movie("Heat", "/data/Movies/Crime/Heat (1995)", 1_000_000_000);
    server.collections.lock().push("Alien Collection".to_string());

    let cache = LibraryIndexCache::load(&blocker, vec![13]).unwrap();
    let summary = cache.refresh(&server).unwrap();

    assert!(!summary.persisted);
    assert_eq!(summary.movies_seen, 1);
    assert!(cache.last_refreshed().is_some());
    assert_eq!(
        cache.find_movie("Heat").as_deref(),
        Some("/data/Movies/Crime/Heat (1995)")
    );
    assert_eq!(
        cache.find_collection("Alien Collection").as_deref(),
        Some("/data/Movies/Alien Collection")
    );
}
