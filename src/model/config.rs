use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration from config.toml. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage file (default: `$XDG_DATA_HOME/tasklist/storage.json`)
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Byte budget for keys plus values, like a browser's local storage
    #[serde(default = "default_quota_bytes")]
    pub quota_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            path: None,
            quota_bytes: default_quota_bytes(),
        }
    }
}

fn default_quota_bytes() -> usize {
    5 * 1024 * 1024
}

/// Which zone calendar-day filters and naive due dates are evaluated in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeZonePolicy {
    #[default]
    Local,
    Utc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    #[serde(default)]
    pub time_zone: TimeZonePolicy,
    /// Countdown refresh period in milliseconds
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        ViewConfig {
            time_zone: TimeZonePolicy::Local,
            tick_ms: default_tick_ms(),
        }
    }
}

fn default_tick_ms() -> u64 {
    1000
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Theme used when storage has no `theme` entry ("light" or "dark")
    #[serde(default = "default_theme")]
    pub default_theme: String,
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    /// How long a toast stays on screen
    #[serde(default = "default_toast_ms")]
    pub toast_ms: u64,
    /// Hex color overrides (e.g. `highlight = "#FB4196"`), applied to both palettes
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            default_theme: default_theme(),
            show_key_hints: true,
            toast_ms: default_toast_ms(),
            colors: HashMap::new(),
        }
    }
}

fn default_theme() -> String {
    "dark".to_string()
}

fn default_true() -> bool {
    true
}

fn default_toast_ms() -> u64 {
    2000
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// EnvFilter directive; `TASKLIST_LOG` takes precedence
    #[serde(default)]
    pub level: Option<String>,
    /// Log file used by the TUI (default: next to the storage file)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.storage.quota_bytes, 5_242_880);
        assert_eq!(config.view.tick_ms, 1000);
        assert_eq!(config.ui.toast_ms, 2000);
        assert_eq!(config.ui.default_theme, "dark");
        assert!(config.ui.show_key_hints);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: AppConfig = toml::from_str(
            r##"
[view]
time_zone = "utc"

[ui.colors]
highlight = "#112233"
"##,
        )
        .unwrap();
        assert_eq!(config.view.time_zone, TimeZonePolicy::Utc);
        assert_eq!(config.view.tick_ms, 1000);
        assert_eq!(config.ui.colors.get("highlight").unwrap(), "#112233");
        assert_eq!(config.ui.toast_ms, 2000);
    }

    #[test]
    fn unknown_time_zone_is_rejected() {
        let result: Result<AppConfig, _> = toml::from_str("[view]\ntime_zone = \"mars\"\n");
        assert!(result.is_err());
    }
}
