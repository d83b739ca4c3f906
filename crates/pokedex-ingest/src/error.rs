//! Error types for extraction runs

use pokedex_common::PokedexError;
use thiserror::Error;

use crate::models::RecordClass;

/// A single failed fetch, carrying the locator that failed
#[derive(Debug, Error)]
#[error("Failed to fetch {locator}: {kind}")]
pub struct FetchError {
    pub locator: String,
    #[source]
    pub kind: FetchErrorKind,
}

impl FetchError {
    pub fn new(locator: impl Into<String>, kind: impl Into<FetchErrorKind>) -> Self {
        Self {
            locator: locator.into(),
            kind: kind.into(),
        }
    }
}

/// Why a fetch failed
#[derive(Debug, Error)]
pub enum FetchErrorKind {
    /// Connection refused, timeout, or body read failure
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("undecodable body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failure of a whole extraction run for one record class
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Catalog page fetch failed for {class}: {source}")]
    PageFetch {
        class: RecordClass,
        #[source]
        source: FetchError,
    },

    #[error("Malformed catalog page {locator} for {class}: {source}")]
    MalformedPage {
        class: RecordClass,
        locator: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write {artifact} artifact: {source}")]
    Write {
        artifact: String,
        #[source]
        source: PokedexError,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("HTTP client setup failed: {0}")]
    Client(#[from] reqwest::Error),
}

impl ExtractError {
    /// Whether the run failed before anything could be written
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, ExtractError::PageFetch { .. } | ExtractError::MalformedPage { .. })
    }
}
