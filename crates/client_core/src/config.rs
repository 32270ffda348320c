use std::{collections::HashMap, fs};

use serde::Deserialize;
use tracing::warn;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api_base_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
        }
    }
}

/// Resolution order: built-in default, then `client.toml`, then `API_BASE_URL`,
/// then `APP__API_BASE_URL`. Invalid URLs are rejected with a warning and the
/// previous value is kept.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("client.toml") {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("api_base_url") {
                apply_base_url(&mut settings, v);
            }
        }
    }

    if let Ok(v) = std::env::var("API_BASE_URL") {
        apply_base_url(&mut settings, &v);
    }
    if let Ok(v) = std::env::var("APP__API_BASE_URL") {
        apply_base_url(&mut settings, &v);
    }

    settings
}

fn apply_base_url(settings: &mut Settings, raw: &str) {
    match normalize_base_url(raw) {
        Some(url) => settings.api_base_url = url,
        None => warn!(value = raw, "ignoring invalid api_base_url"),
    }
}

fn normalize_base_url(raw: &str) -> Option<String> {
    let raw = raw.trim().trim_end_matches('/');
    if raw.is_empty() {
        return None;
    }
    let parsed = Url::parse(raw).ok()?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return None;
    }
    Some(raw.to_string())
}
