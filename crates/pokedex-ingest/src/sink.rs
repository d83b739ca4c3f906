//! Artifact persistence

use async_trait::async_trait;
use pokedex_common::checksum::{compute_bytes_checksum, ChecksumAlgorithm};
use pokedex_common::{PokedexError, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::info;

use crate::models::NormalizedRecord;

/// Where and what a sink wrote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactInfo {
    /// File path or other store-specific location
    pub location: String,
    /// SHA-256 of the serialized document
    pub checksum: String,
    pub bytes: usize,
    pub records: usize,
}

/// Receives the full record collection of a run, exactly once.
#[async_trait]
pub trait Sink: Send + Sync {
    async fn write(&self, artifact_name: &str, records: &[NormalizedRecord]) -> Result<ArtifactInfo>;
}

/// Serialize records as a top-level JSON array indented by four spaces
pub fn render(records: &[NormalizedRecord]) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    records.serialize(&mut serializer)?;
    Ok(buffer)
}

/// Writes `{output_dir}/{artifact_name}.json`
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    output_dir: PathBuf,
}

impl JsonFileSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn artifact_path(&self, artifact_name: &str) -> PathBuf {
        self.output_dir.join(format!("{}.json", artifact_name))
    }
}

#[async_trait]
impl Sink for JsonFileSink {
    async fn write(&self, artifact_name: &str, records: &[NormalizedRecord]) -> Result<ArtifactInfo> {
        if artifact_name.is_empty() || artifact_name.contains(['/', '\\']) {
            return Err(PokedexError::Artifact(format!(
                "invalid artifact name: {:?}",
                artifact_name
            )));
        }

        let body = render(records)?;
        let checksum = compute_bytes_checksum(&body, ChecksumAlgorithm::Sha256);

        tokio::fs::create_dir_all(&self.output_dir).await?;

        // Stage beside the target, then rename into place
        let path = self.artifact_path(artifact_name);
        let staging = self.output_dir.join(format!(".{}.json.tmp", artifact_name));
        tokio::fs::write(&staging, &body).await?;
        if let Err(e) = tokio::fs::rename(&staging, &path).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(e.into());
        }

        info!(
            path = %path.display(),
            records = records.len(),
            bytes = body.len(),
            checksum = %checksum,
            "Artifact written"
        );

        Ok(ArtifactInfo {
            location: path.display().to_string(),
            checksum,
            bytes: body.len(),
            records: records.len(),
        })
    }
}

/// Keeps every write in memory, for embedding and tests
#[derive(Debug, Default)]
pub struct MemorySink {
    writes: Mutex<Vec<(String, Vec<u8>, Vec<NormalizedRecord>)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Artifact names in write order
    pub fn artifact_names(&self) -> Vec<String> {
        self.lock().iter().map(|(name, _, _)| name.clone()).collect()
    }

    /// Records of the most recent write to `artifact_name`
    pub fn records(&self, artifact_name: &str) -> Option<Vec<NormalizedRecord>> {
        self.lock()
            .iter()
            .rev()
            .find(|(name, _, _)| name == artifact_name)
            .map(|(_, _, records)| records.clone())
    }

    /// Serialized bytes of the most recent write to `artifact_name`
    pub fn document(&self, artifact_name: &str) -> Option<Vec<u8>> {
        self.lock()
            .iter()
            .rev()
            .find(|(name, _, _)| name == artifact_name)
            .map(|(_, body, _)| body.clone())
    }

    pub fn write_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(String, Vec<u8>, Vec<NormalizedRecord>)>> {
        // A poisoned lock still holds complete writes
        self.writes.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Sink for MemorySink {
    async fn write(&self, artifact_name: &str, records: &[NormalizedRecord]) -> Result<ArtifactInfo> {
        let body = render(records)?;
        let info = ArtifactInfo {
            location: format!("memory://{}", artifact_name),
            checksum: compute_bytes_checksum(&body, ChecksumAlgorithm::Sha256),
            bytes: body.len(),
            records: records.len(),
        };

        self.lock().push((artifact_name.to_string(), body, records.to_vec()));
        Ok(info)
    }
}
