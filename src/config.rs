use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::filter::FilterMode;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_tick_rate")]
    pub tick_rate_fps: f64,
    #[serde(default)]
    pub default_filter: FilterMode,
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_api_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_tick_rate() -> f64 {
    30.0
}

fn default_date_format() -> String {
    "%Y-%m-%d %H:%M".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            tick_rate_fps: default_tick_rate(),
            default_filter: FilterMode::default(),
            date_format: default_date_format(),
        }
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config/snapmod/config.toml"))
}

pub fn load_config() -> AppConfig {
    let Some(path) = config_path() else {
        return AppConfig::default();
    };

    let Ok(contents) = fs::read_to_string(&path) else {
        return AppConfig::default();
    };

    parse_config(&contents)
}

fn parse_config(contents: &str) -> AppConfig {
    toml::from_str(contents).unwrap_or_else(|e| {
        tracing::warn!("ignoring malformed config.toml: {e}");
        AppConfig::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = parse_config("");
        assert_eq!(cfg.api_base_url, "http://localhost:3000");
        assert_eq!(cfg.default_filter, FilterMode::Message);
        assert_eq!(cfg.tick_rate_fps, 30.0);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let cfg = parse_config(
            r#"
            api_base_url = "https://admin.example.com"
            default_filter = "created_at"
            "#,
        );
        assert_eq!(cfg.api_base_url, "https://admin.example.com");
        assert_eq!(cfg.default_filter, FilterMode::CreatedAt);
        assert_eq!(cfg.date_format, "%Y-%m-%d %H:%M");
    }

    #[test]
    fn malformed_file_falls_back() {
        let cfg = parse_config("tick_rate_fps = \"fast\"");
        assert_eq!(cfg.tick_rate_fps, 30.0);
    }
}
