use anyhow::Context;
use serde::Deserialize;

/// Display strings for built entries. Hosts swap these for localized resources.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MenuLabels {
    /// Heading of the playlist checklist group.
    pub add_to_playlist: String,
    pub open_channel: String,
    pub subscribe: String,
    pub unsubscribe: String,
    pub not_interested: String,
    pub share: String,
}

impl Default for MenuLabels {
    fn default() -> Self {
        Self {
            add_to_playlist: "Add to playlist".into(),
            open_channel: "Open channel".into(),
            subscribe: "Subscribe".into(),
            unsubscribe: "Unsubscribe".into(),
            not_interested: "Not interested".into(),
            share: "Share".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MenuSettings {
    /// Show the subscribe/unsubscribe notice as soon as the request is issued
    /// instead of after it succeeds.
    pub optimistic_subscribe_notice: bool,
    /// Show a notice when the playlist fetch fails. The menu closes either way.
    pub notify_on_fetch_failure: bool,
    pub labels: MenuLabels,
}

impl Default for MenuSettings {
    fn default() -> Self {
        Self {
            optimistic_subscribe_notice: true,
            notify_on_fetch_failure: false,
            labels: MenuLabels::default(),
        }
    }
}

impl MenuSettings {
    pub fn from_toml_str(raw: &str) -> anyhow::Result<Self> {
        toml::from_str(raw).context("invalid menu settings")
    }
}
