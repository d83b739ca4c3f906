//! Pokedex Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared utilities and error handling for the Pokedex extraction workspace.
//!
//! # Overview
//!
//! - **Error Handling**: Custom error type and result alias
//! - **Logging**: Console/file tracing setup shared by every binary
//! - **Checksums**: Artifact integrity utilities
//!
//! # Example
//!
//! ```no_run
//! use pokedex_common::checksum::{compute_file_checksum, ChecksumAlgorithm};
//! use pokedex_common::Result;
//!
//! fn report(path: &str) -> Result<()> {
//!     let checksum = compute_file_checksum(path, ChecksumAlgorithm::Sha256)?;
//!     tracing::info!(%checksum, "Artifact checksum");
//!     Ok(())
//! }
//! ```

pub mod checksum;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use error::{PokedexError, Result};
