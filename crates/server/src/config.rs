use std::{collections::HashMap, fs, path::PathBuf};

use serde::Deserialize;

pub const SETTINGS_FILE: &str = "server.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub server_bind: String,
    /// JSON snapshot of the issue store. `None` keeps issues in memory only.
    pub data_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8000".into(),
            data_file: None,
        }
    }
}

/// Defaults, then `server.toml` in the working directory, then environment.
pub fn load_settings() -> Settings {
    let file = fs::read_to_string(SETTINGS_FILE).ok();
    resolve_settings(file.as_deref(), |name| std::env::var(name).ok())
}

pub fn resolve_settings(
    file_contents: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file_contents {
        match toml::from_str::<HashMap<String, String>>(raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.get("bind_addr") {
                    settings.server_bind = v.clone();
                }
                if let Some(v) = file_cfg.get("data_file") {
                    settings.data_file = non_empty_path(v);
                }
            }
            Err(err) => {
                tracing::warn!(%err, file = SETTINGS_FILE, "ignoring unreadable settings file");
            }
        }
    }

    let lookup = |name: &str| env(name).filter(|value| !value.trim().is_empty());

    if let Some(v) = lookup("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = lookup("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = lookup("ISSUES_DATA_FILE") {
        settings.data_file = non_empty_path(&v);
    }
    if let Some(v) = lookup("APP__DATA_FILE") {
        settings.data_file = non_empty_path(&v);
    }

    settings
}

fn non_empty_path(raw: &str) -> Option<PathBuf> {
    let raw = raw.trim();
    if raw.is_empty() {
        None
    } else {
        Some(PathBuf::from(raw))
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
