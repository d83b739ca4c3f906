//! Extraction run configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

use crate::error::ExtractError;
use crate::models::RecordClass;

/// Public PokéAPI root
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2/";

/// In-flight detail fetches per catalog page
pub const DEFAULT_CONCURRENCY: usize = 20;

/// Configuration for one or more extraction runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// API root every catalog path is appended to
    pub base_url: String,
    /// Maximum concurrent detail fetches (default: 20)
    pub concurrency: usize,
    /// Per-request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// Directory receiving one `{class}.json` artifact per run
    pub output_dir: PathBuf,
    /// Page size requested for flat (single page) catalogs
    pub flat_catalog_limit: u32,
    /// Draw a progress bar while pages are processed
    pub show_progress: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            timeout_secs: 30,
            user_agent: format!("pokedex-ingest/{}", env!("CARGO_PKG_VERSION")),
            output_dir: PathBuf::from("./data"),
            flat_catalog_limit: 1000,
            show_progress: false,
        }
    }
}

impl ExtractConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overlaid with environment variables
    ///
    /// Environment variables:
    /// - `POKEAPI_BASE_URL`: API root
    /// - `EXTRACT_CONCURRENCY`: concurrent detail fetches
    /// - `EXTRACT_TIMEOUT_SECS`: request timeout
    /// - `EXTRACT_OUTPUT_DIR`: artifact directory
    pub fn from_env() -> Result<Self, ExtractError> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("POKEAPI_BASE_URL") {
            config.base_url = url;
        }

        if let Ok(value) = std::env::var("EXTRACT_CONCURRENCY") {
            config.concurrency = value.parse().map_err(|_| {
                ExtractError::Config(format!("EXTRACT_CONCURRENCY is not a number: {}", value))
            })?;
        }

        if let Ok(value) = std::env::var("EXTRACT_TIMEOUT_SECS") {
            config.timeout_secs = value.parse().map_err(|_| {
                ExtractError::Config(format!("EXTRACT_TIMEOUT_SECS is not a number: {}", value))
            })?;
        }

        if let Ok(dir) = std::env::var("EXTRACT_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_flat_catalog_limit(mut self, limit: u32) -> Self {
        self.flat_catalog_limit = limit;
        self
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Check the settings before any request is made
    pub fn validate(&self) -> Result<(), ExtractError> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| ExtractError::Config(format!("invalid base URL {}: {}", self.base_url, e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ExtractError::Config(format!(
                "base URL must be http(s), got {}",
                url.scheme()
            )));
        }

        if self.concurrency == 0 {
            return Err(ExtractError::Config("concurrency must be at least 1".to_string()));
        }

        if self.timeout_secs == 0 {
            return Err(ExtractError::Config("timeout must be at least 1 second".to_string()));
        }

        if self.flat_catalog_limit == 0 {
            return Err(ExtractError::Config("flat catalog limit must be at least 1".to_string()));
        }

        Ok(())
    }

    /// First page locator for a record class
    pub fn catalog_url(&self, class: RecordClass) -> String {
        let base = self.base_url.trim_end_matches('/');
        let url = format!("{}/{}", base, class.catalog_path());

        if class.is_paginated() {
            url
        } else {
            format!("{}?limit={}", url, self.flat_catalog_limit)
        }
    }

    /// Artifact path for a record class
    pub fn artifact_path(&self, class: RecordClass) -> PathBuf {
        self.output_dir.join(format!("{}.json", class.artifact_name()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExtractConfig::default();
        assert_eq!(config.base_url, "https://pokeapi.co/api/v2/");
        assert_eq!(config.concurrency, 20);
        assert_eq!(config.output_dir, PathBuf::from("./data"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_catalog_urls() {
        let config = ExtractConfig::default();
        assert_eq!(
            config.catalog_url(RecordClass::Pokemon),
            "https://pokeapi.co/api/v2/pokemon-species/"
        );
        assert_eq!(config.catalog_url(RecordClass::Item), "https://pokeapi.co/api/v2/item/");
        assert_eq!(
            config.catalog_url(RecordClass::Type),
            "https://pokeapi.co/api/v2/type/?limit=1000"
        );
    }

    #[test]
    fn test_catalog_url_without_trailing_slash() {
        let config = ExtractConfig::new().with_base_url("http://localhost:8080/api/v2");
        assert_eq!(
            config.catalog_url(RecordClass::Move),
            "http://localhost:8080/api/v2/move/"
        );
    }

    #[test]
    fn test_artifact_path() {
        let config = ExtractConfig::new().with_output_dir("/tmp/out");
        assert_eq!(
            config.artifact_path(RecordClass::Ability),
            PathBuf::from("/tmp/out/ability.json")
        );
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        assert!(ExtractConfig::new().with_base_url("not a url").validate().is_err());
        assert!(ExtractConfig::new().with_base_url("ftp://pokeapi.co/").validate().is_err());
        assert!(ExtractConfig::new().with_concurrency(0).validate().is_err());
        assert!(ExtractConfig::new().with_timeout(0).validate().is_err());
        assert!(ExtractConfig::new().with_flat_catalog_limit(0).validate().is_err());
    }

    #[test]
    fn test_builder_pattern() {
        let config = ExtractConfig::new()
            .with_base_url("http://127.0.0.1:9000/")
            .with_concurrency(4)
            .with_timeout(5)
            .with_output_dir("out")
            .with_progress(true);

        assert_eq!(config.base_url, "http://127.0.0.1:9000/");
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert!(config.show_progress);
    }
}
