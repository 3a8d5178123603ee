use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use serde::Deserialize;
use url::Url;

pub const SETTINGS_FILE: &str = "inventory.toml";
const DEFAULT_API_URL: &str = "http://localhost:4000/productos";
const DEFAULT_NOTIFICATION_MS: u64 = 3000;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_url: Url,
    pub notification_ttl: Duration,
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_url: Option<String>,
    notification_ms: Option<u64>,
}

/// Unvalidated values, layered defaults < file < env < flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawSettings {
    pub(crate) api_url: String,
    pub(crate) notification_ms: u64,
}

impl Default for RawSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            notification_ms: DEFAULT_NOTIFICATION_MS,
        }
    }
}

pub fn load_settings(config_path: Option<&Path>, api_url_flag: Option<&str>) -> Result<Settings> {
    let mut raw = RawSettings::default();

    let path = config_path.unwrap_or_else(|| Path::new(SETTINGS_FILE));
    match fs::read_to_string(path) {
        Ok(contents) => apply_file_overrides(&mut raw, &contents)
            .with_context(|| format!("invalid settings file '{}'", path.display()))?,
        Err(err) if config_path.is_some() => {
            return Err(err)
                .with_context(|| format!("failed to read settings file '{}'", path.display()));
        }
        Err(_) => {}
    }

    apply_env_overrides(&mut raw, |key| std::env::var(key).ok());
    if let Some(flag) = api_url_flag {
        raw.api_url = flag.to_string();
    }

    finalize(raw)
}

pub(crate) fn apply_file_overrides(raw: &mut RawSettings, contents: &str) -> Result<()> {
    let file: FileSettings = toml::from_str(contents)?;
    if let Some(v) = file.api_url {
        raw.api_url = v;
    }
    if let Some(v) = file.notification_ms {
        raw.notification_ms = v;
    }
    Ok(())
}

pub(crate) fn apply_env_overrides(raw: &mut RawSettings, lookup: impl Fn(&str) -> Option<String>) {
    for key in ["INVENTORY_API_URL", "APP__API_URL"] {
        if let Some(v) = lookup(key) {
            raw.api_url = v;
        }
    }
    if let Some(v) = lookup("APP__NOTIFICATION_MS") {
        match v.parse::<u64>() {
            Ok(parsed) => raw.notification_ms = parsed,
            Err(_) => tracing::warn!(value = %v, "ignoring non-numeric APP__NOTIFICATION_MS"),
        }
    }
}

pub(crate) fn finalize(raw: RawSettings) -> Result<Settings> {
    let api_url = Url::parse(raw.api_url.trim())
        .with_context(|| format!("invalid product store url '{}'", raw.api_url))?;
    if !matches!(api_url.scheme(), "http" | "https") {
        anyhow::bail!(
            "product store url must be http or https, got '{}'",
            api_url.scheme()
        );
    }
    Ok(Settings {
        api_url,
        notification_ttl: Duration::from_millis(raw.notification_ms),
    })
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
