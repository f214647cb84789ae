use reelroute::core::config::Config;
use reelroute::ReelError;
use std::fs;
use tempfile::TempDir;

const FULL_CONFIG: &str = r#"
remotes = ["gd1", "gd2", "gd3"]
plex_server = "http://127.0.0.1:32400"
plex_token = "token"
sonarr_data = "/tmp/sonarr.json"
radarr_data = "/tmp/radarr.json"
uhd_radarr_data = "/tmp/radarr4k.json"
radarr_url = "http://127.0.0.1:7878"
radarr_api = "key"
rclone_state = "/tmp/rclone_state.json"
rclone_log_file = "/tmp/rclone-"
base_path = "/mnt/media"
plex_base_path = "/data"
movie_base_path = "Movies"
uhd_base_path = "Movies 4K"
threads = 2
queue_capacity = 3
poll_interval_ms = 250

[[libraries]]
path = "/data/TV"
id = 2

[[libraries]]
path = "/data/Movies"
id = 13
"#;

#[test]
fn test_config_load_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, FULL_CONFIG).unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.remotes.len(), 3);
    assert_eq!(config.threads, 2);
    assert_eq!(config.queue_capacity(), 3);
    assert_eq!(config.poll_interval().as_millis(), 250);
    assert_eq!(config.libraries[1].id, 13);
    assert_eq!(config.movie_sections(), vec![2, 13]);
}

#[test]
fn test_config_missing_file_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let err = Config::load_from(&temp_dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, ReelError::Config(_)));
}

#[test]
fn test_config_invalid_toml_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, "remotes = [").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(matches!(err, ReelError::Config(_)));
    assert!(err.to_string().contains("config.toml"));
}

#[test]
fn test_config_requires_base_paths() {
    let toml = FULL_CONFIG.replace("plex_base_path = \"/data\"", "");
    assert!(Config::from_toml(&toml).is_err());
}

#[test]
fn test_explicit_cache_dir_wins() {
    let toml = format!("cache_dir = \"/var/cache/reelroute\"\n{}", FULL_CONFIG);
    let config = Config::from_toml(&toml).unwrap();
    assert_eq!(
        config.cache_dir().unwrap(),
        std::path::PathBuf::from("/var/cache/reelroute")
    );
}
