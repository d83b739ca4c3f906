//! Pokedex Ingest Library
//!
//! Extracts PokéAPI catalogs into flat JSON snapshots.
//!
//! # Supported Record Classes
//!
//! - **pokemon**: stats, types, moves, game versions, height and weight
//! - **type**: damage relations
//! - **move**: power, pp, type and damage class
//! - **ability**: pokemon that can have the ability
//! - **item**: item category
//!
//! # Example
//!
//! ```no_run
//! use pokedex_ingest::{ExtractConfig, ExtractionPipeline, RecordClass};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ExtractConfig::new().with_output_dir("./data");
//!     let pipeline = ExtractionPipeline::with_http(config)?;
//!
//!     let report = pipeline.run(RecordClass::Pokemon).await?;
//!     println!("{}", report.summary());
//!     Ok(())
//! }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod config;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod sink;
pub mod transform;
pub mod transport;

// Re-export commonly used types
pub use config::ExtractConfig;
pub use error::{ExtractError, FetchError, FetchErrorKind};
pub use fetcher::DetailFetcher;
pub use models::{NormalizedRecord, Page, RecordClass};
pub use pipeline::{Extraction, ExtractionPipeline};
pub use report::{RunMetadata, RunReport};
pub use sink::{ArtifactInfo, JsonFileSink, MemorySink, Sink};
pub use transform::transform;
pub use transport::{HttpTransport, Transport};
