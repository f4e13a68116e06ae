use super::{resolve_settings, Settings};

use std::{collections::HashMap, path::PathBuf};

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

#[test]
fn defaults_bind_locally_without_data_file() {
    let settings = resolve_settings(None, env_from(&[]));
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.server_bind, "127.0.0.1:8000");
    assert!(settings.data_file.is_none());
}

#[test]
fn file_values_override_defaults() {
    let settings = resolve_settings(
        Some("bind_addr = \"0.0.0.0:9000\"\ndata_file = \"./data/issues.json\"\n"),
        env_from(&[]),
    );
    assert_eq!(settings.server_bind, "0.0.0.0:9000");
    assert_eq!(settings.data_file, Some(PathBuf::from("./data/issues.json")));
}

#[test]
fn environment_overrides_file_and_app_prefix_wins() {
    let settings = resolve_settings(
        Some("bind_addr = \"0.0.0.0:9000\"\n"),
        env_from(&[
            ("SERVER_BIND", "127.0.0.1:7000"),
            ("APP__BIND_ADDR", "127.0.0.1:7001"),
            ("ISSUES_DATA_FILE", "/tmp/issues.json"),
        ]),
    );
    assert_eq!(settings.server_bind, "127.0.0.1:7001");
    assert_eq!(settings.data_file, Some(PathBuf::from("/tmp/issues.json")));
}

#[test]
fn empty_environment_values_are_ignored() {
    let settings = resolve_settings(
        Some("data_file = \"issues.json\"\n"),
        env_from(&[("SERVER_BIND", " "), ("APP__DATA_FILE", "")]),
    );
    assert_eq!(settings.server_bind, "127.0.0.1:8000");
    assert_eq!(settings.data_file, Some(PathBuf::from("issues.json")));
}

#[test]
fn unreadable_file_falls_back_to_defaults() {
    let settings = resolve_settings(Some("bind_addr = [1, 2"), env_from(&[]));
    assert_eq!(settings, Settings::default());
}
