use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::warn;

pub const SETTINGS_FILE: &str = "customers.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    pub server_url: String,
    pub log_filter: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8080".into(),
            log_filter: "info".into(),
        }
    }
}

/// `customers.toml` in the working directory, else the user config dir.
pub fn settings_path() -> Option<PathBuf> {
    let local = PathBuf::from(SETTINGS_FILE);
    if local.is_file() {
        return Some(local);
    }
    dirs::config_dir()
        .map(|dir| dir.join("customers").join(SETTINGS_FILE))
        .filter(|path| path.is_file())
}

pub fn load_settings() -> ClientSettings {
    let settings = match settings_path() {
        Some(path) => load_settings_from(&path),
        None => ClientSettings::default(),
    };
    apply_overrides(settings, |key| std::env::var(key).ok())
}

/// Reads a settings file. Unreadable or malformed files fall back to the
/// defaults.
pub fn load_settings_from(path: &Path) -> ClientSettings {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) => {
            warn!(path = %path.display(), "failed to read settings: {err}");
            return ClientSettings::default();
        }
    };
    match toml::from_str::<ClientSettings>(&raw) {
        Ok(settings) => settings,
        Err(err) => {
            warn!(path = %path.display(), "ignoring malformed settings: {err}");
            ClientSettings::default()
        }
    }
}

/// Environment overrides. `APP__*` names win over the plain ones.
pub fn apply_overrides(
    mut settings: ClientSettings,
    lookup: impl Fn(&str) -> Option<String>,
) -> ClientSettings {
    if let Some(v) = lookup("CUSTOMERS_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = lookup("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = lookup("CUSTOMERS_LOG") {
        settings.log_filter = v;
    }
    if let Some(v) = lookup("APP__LOG") {
        settings.log_filter = v;
    }

    settings
}
