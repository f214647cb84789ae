use reelroute::core::rotation::RemoteRotation;
use std::collections::HashMap;
use std::fs;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

fn remotes() -> Vec<String> {
    vec!["gd1".to_string(), "gd2".to_string(), "gd3".to_string()]
}

#[test]
fn test_fresh_rotation_cycles_in_order() {
    let temp_dir = TempDir::new().unwrap();
    let rotation = RemoteRotation::load(remotes(), temp_dir.path().join("state.json")).unwrap();

    let picked: Vec<String> = (0..4)
        .map(|_| rotation.claim_next().unwrap().remote)
        .collect();
    assert_eq!(picked, vec!["gd1", "gd2", "gd3", "gd1"]);
}

#[test]
fn test_persisted_index_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    let state = temp_dir.path().join("state.json");

    {
        let rotation = RemoteRotation::load(remotes(), &state).unwrap();
        rotation.claim_next().unwrap();
        rotation.claim_next().unwrap();
    }

    let content = fs::read_to_string(&state).unwrap();
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(json["index"], 2);

    let rotation = RemoteRotation::load(remotes(), &state).unwrap();
    assert_eq!(rotation.claim_next().unwrap().remote, "gd3");
}

#[test]
fn test_n_claims_land_on_n_mod_len() {
    let temp_dir = TempDir::new().unwrap();
    let rotation = RemoteRotation::load(remotes(), temp_dir.path().join("state.json")).unwrap();

    for _ in 0..7 {
        rotation.claim_next().unwrap();
    }
    assert_eq!(rotation.current_index(), 7 % 3);
}

#[test]
fn test_concurrent_claims_are_evenly_spread() {
    let temp_dir = TempDir::new().unwrap();
    let state = temp_dir.path().join("state.json");
    let rotation = Arc::new(RemoteRotation::load(remotes(), &state).unwrap());

    let handles: Vec<_> = (0..6)
        .map(|_| {
            let rotation = Arc::clone(&rotation);
            thread::spawn(move || {
                (0..5)
                    .map(|_| rotation.claim_next().unwrap().remote)
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut counts: HashMap<String, usize> = HashMap::new();
    for handle in handles {
        for remote in handle.join().unwrap() {
            *counts.entry(remote).or_default() += 1;
        }
    }

    // 30 claims over 3 remotes: each one exactly 10 times, no duplicate slot
    assert_eq!(counts.len(), 3);
    assert!(counts.values().all(|&n| n == 10));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&state).unwrap()).unwrap();
    assert_eq!(json["index"], 0);
}

#[test]
fn test_corrupt_state_starts_over() {
    let temp_dir = TempDir::new().unwrap();
    let state = temp_dir.path().join("state.json");
    fs::write(&state, "not json").unwrap();

    let rotation = RemoteRotation::load(remotes(), &state).unwrap();
    assert_eq!(rotation.claim_next().unwrap().remote, "gd1");
}

#[test]
fn test_reset_returns_to_first_remote() {
    let temp_dir = TempDir::new().unwrap();
    let rotation = RemoteRotation::load(remotes(), temp_dir.path().join("state.json")).unwrap();
    rotation.claim_next().unwrap();
    rotation.reset().unwrap();
    assert_eq!(rotation.claim_next().unwrap().remote, "gd1");
}
