use std::{fs, io::ErrorKind, path::Path};

use anyhow::Context;
use menu_core::MenuSettings;
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlaylistSeed {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub videos: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    pub latency_ms: u64,
    pub signed_in: bool,
    pub fail_fetch: bool,
    pub fail_mutations: bool,
    pub playlists: Vec<PlaylistSeed>,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            latency_ms: 150,
            signed_in: true,
            fail_fetch: false,
            fail_mutations: false,
            playlists: vec![
                PlaylistSeed {
                    id: "WL".into(),
                    title: "Watch Later".into(),
                    videos: Vec::new(),
                },
                PlaylistSeed {
                    id: "FAV".into(),
                    title: "Favorites".into(),
                    videos: Vec::new(),
                },
            ],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub menu: MenuSettings,
    pub service: ServiceSettings,
}

/// Defaults, then the TOML file if present, then `APP__*` environment overrides.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = match fs::read_to_string(path) {
        Ok(raw) => toml::from_str::<Settings>(&raw)
            .with_context(|| format!("failed to parse settings file '{}'", path.display()))?,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "config: no settings file, using defaults");
            Settings::default()
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read settings file '{}'", path.display()))
        }
    };

    apply_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

pub fn apply_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("APP__LATENCY_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.service.latency_ms = parsed;
        }
    }
    if let Some(v) = lookup("APP__SIGNED_IN").and_then(|v| parse_flag(&v)) {
        settings.service.signed_in = v;
    }
    if let Some(v) = lookup("APP__FAIL_FETCH").and_then(|v| parse_flag(&v)) {
        settings.service.fail_fetch = v;
    }
    if let Some(v) = lookup("APP__FAIL_MUTATIONS").and_then(|v| parse_flag(&v)) {
        settings.service.fail_mutations = v;
    }
    if let Some(v) = lookup("APP__OPTIMISTIC_SUBSCRIBE_NOTICE").and_then(|v| parse_flag(&v)) {
        settings.menu.optimistic_subscribe_notice = v;
    }
    if let Some(v) = lookup("APP__NOTIFY_ON_FETCH_FAILURE").and_then(|v| parse_flag(&v)) {
        settings.menu.notify_on_fetch_failure = v;
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
