use crate::errors::ConfigError;
use serde::Serialize;
use std::env;

pub const DEPLOYED_BASE_URL: &str = "https://flask-fire-837838013707.africa-south1.run.app/";
pub const LOCAL_BASE_URL: &str = "http://127.0.0.1:8080/";

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_RANGES: &[&str] = &["day", "week", "month"];

/// Which regions the dashboard page wires up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Panels {
    /// Stats, last interaction and the streaming toggle.
    #[default]
    Full,
    /// Only the streaming toggle; nothing is fetched at start.
    ToggleOnly,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub port: u16,
    pub ranges: Vec<String>,
    pub panels: Panels,
    pub sync_streaming_on_load: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_base_url = match lookup("DASHBOARD_API_URL").filter(|url| !url.trim().is_empty()) {
            Some(url) => normalize_base_url(&url),
            None => match lookup("DASHBOARD_API_TARGET").as_deref().map(str::trim) {
                None | Some("") | Some("deployed") => DEPLOYED_BASE_URL.to_string(),
                Some("local") => LOCAL_BASE_URL.to_string(),
                Some(other) => {
                    return Err(ConfigError::InvalidValue {
                        name: "DASHBOARD_API_TARGET",
                        expected: "'deployed' or 'local'",
                        value: other.to_string(),
                    });
                }
            },
        };

        let port = lookup("PORT")
            .and_then(|value| value.trim().parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let ranges = match lookup("DASHBOARD_RANGES") {
            Some(raw) => {
                let ranges: Vec<String> = raw
                    .split(',')
                    .map(str::trim)
                    .filter(|range| !range.is_empty())
                    .map(str::to_string)
                    .collect();
                if ranges.is_empty() {
                    return Err(ConfigError::NoRanges);
                }
                ranges
            }
            None => DEFAULT_RANGES.iter().map(|range| range.to_string()).collect(),
        };

        let panels = match lookup("DASHBOARD_PANELS").as_deref().map(str::trim) {
            None | Some("") | Some("full") => Panels::Full,
            Some("toggle-only") => Panels::ToggleOnly,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    name: "DASHBOARD_PANELS",
                    expected: "'full' or 'toggle-only'",
                    value: other.to_string(),
                });
            }
        };

        let sync_streaming_on_load = lookup("DASHBOARD_SYNC_STREAMING")
            .map(|value| matches!(value.trim(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            api_base_url,
            port,
            ranges,
            panels,
            sync_streaming_on_load,
        })
    }

    pub fn default_range(&self) -> &str {
        self.ranges.first().map(String::as_str).unwrap_or("day")
    }

    pub fn video_feed_url(&self) -> String {
        format!("{}video_feed", self.api_base_url)
    }
}

/// Endpoint paths are appended directly, so the base always ends in `/`.
pub fn normalize_base_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    format!("{trimmed}/")
}
