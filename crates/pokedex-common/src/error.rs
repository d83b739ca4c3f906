//! Error types shared across the workspace

use thiserror::Error;

/// Result type alias for Pokedex operations
pub type Result<T> = std::result::Result<T, PokedexError>;

/// Main error type for filesystem and serialization concerns
#[derive(Error, Debug)]
pub enum PokedexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("Artifact error: {0}")]
    Artifact(String),
}
