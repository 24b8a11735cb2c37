use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::entities::debounce::SEARCH_DEBOUNCE;
use crate::domain::entities::filter::DEFAULT_ITEMS_PER_PAGE;

pub const API_URL_ENV: &str = "FINBOARD_API_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub items_per_page: u32,
    pub search_debounce_ms: u64,
    /// Overrides where the settings database lives.
    pub data_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3333".to_string(),
            request_timeout_secs: 15,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            search_debounce_ms: SEARCH_DEBOUNCE.as_millis() as u64,
            data_dir: None,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::load_from(path)?.with_env_override(|key| std::env::var(key).ok()))
    }

    /// Missing file means defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("failed to parse config: {}", path.display()))?;
        Ok(config.normalized())
    }

    pub fn with_env_override(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(API_URL_ENV).filter(|url| !url.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
        self
    }

    fn normalized(mut self) -> Self {
        self.items_per_page = self.items_per_page.max(1);
        self.request_timeout_secs = self.request_timeout_secs.max(1);
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let config =
            AppConfig::load_from(&dir.path().join("config.toml")).expect("defaults should load");

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.search_debounce(), Duration::from_millis(500));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("should create temp file");
        writeln!(
            file,
            "api_base_url = \"https://api.example.test\"\nitems_per_page = 0"
        )
        .expect("should write config");

        let config = AppConfig::load_from(file.path()).expect("config should parse");

        assert_eq!(config.api_base_url, "https://api.example.test");
        assert_eq!(config.items_per_page, 1);
        assert_eq!(config.request_timeout_secs, 15);
    }

    #[test]
    fn env_override_wins() {
        let config = AppConfig::default().with_env_override(|key| {
            (key == API_URL_ENV).then(|| " http://10.0.0.2:3333 ".to_string())
        });

        assert_eq!(config.api_base_url, "http://10.0.0.2:3333");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().expect("should create temp file");
        writeln!(file, "items_per_page = \"ten\"").expect("should write config");

        assert!(AppConfig::load_from(file.path()).is_err());
    }
}
