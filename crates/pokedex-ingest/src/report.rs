//! Run metadata and reporting

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::{info, warn};

use crate::models::RecordClass;
use crate::sink::ArtifactInfo;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Accounting for one extraction run of one record class
#[derive(Debug, Clone, Serialize)]
pub struct RunMetadata {
    pub record_class: RecordClass,
    pub started_at: DateTime<Local>,
    /// Stamped only when every page was processed
    pub finished_at: Option<DateTime<Local>>,
    /// Records that made it into the artifact
    pub extracted: usize,
    /// `count` declared by the last catalog page
    pub expected: Option<u64>,
    pub pages: usize,
}

impl RunMetadata {
    /// Open a run, stamping the start time
    pub fn start(record_class: RecordClass) -> Self {
        Self {
            record_class,
            started_at: Local::now(),
            finished_at: None,
            extracted: 0,
            expected: None,
            pages: 0,
        }
    }

    /// Close the run, stamping the end time
    pub fn finish(&mut self, extracted: usize, expected: Option<u64>, pages: usize) {
        self.finished_at = Some(Local::now());
        self.extracted = extracted;
        self.expected = expected;
        self.pages = pages;
    }

    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    pub fn elapsed_secs(&self) -> Option<f64> {
        self.finished_at
            .map(|end| (end - self.started_at).num_milliseconds() as f64 / 1000.0)
    }

    /// Whether every declared catalog entry was extracted
    pub fn is_complete(&self) -> bool {
        self.expected
            .is_some_and(|expected| expected == self.extracted as u64)
    }

    /// Log this run through [`record`]; unfinished runs are not reported
    pub fn report(&self) {
        if let Some(end) = self.finished_at {
            record(self.started_at, end, self.record_class, self.extracted, self.expected);
        }
    }
}

/// Log start, end, duration and count accounting for a completed run.
///
/// A count mismatch is logged as a warning and is otherwise ignored.
pub fn record(
    start: DateTime<Local>,
    end: DateTime<Local>,
    record_class: RecordClass,
    actual: usize,
    expected: Option<u64>,
) {
    let elapsed = (end - start).num_milliseconds() as f64 / 1000.0;

    info!(
        record_class = %record_class,
        "Extraction process started at {}",
        start.format(TIMESTAMP_FORMAT)
    );
    info!(
        record_class = %record_class,
        "Extraction process ended at {}",
        end.format(TIMESTAMP_FORMAT)
    );
    info!(
        record_class = %record_class,
        elapsed_secs = elapsed,
        "Extraction process time taken: {:.3} seconds",
        elapsed
    );

    match expected {
        Some(expected) if expected == actual as u64 => {
            info!(
                record_class = %record_class,
                count = actual,
                expected = expected,
                "Extracted {} of {} {} records",
                actual,
                expected,
                record_class
            );
        },
        Some(expected) => {
            warn!(
                record_class = %record_class,
                count = actual,
                expected = expected,
                missing = expected.saturating_sub(actual as u64),
                "Extracted {} of {} {} records",
                actual,
                expected,
                record_class
            );
        },
        None => {
            warn!(
                record_class = %record_class,
                count = actual,
                "Extracted {} {} records; catalog declared no count",
                actual,
                record_class
            );
        },
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub metadata: RunMetadata,
    pub artifact: ArtifactInfo,
}

impl RunReport {
    pub fn is_complete(&self) -> bool {
        self.metadata.is_complete()
    }

    /// One-line summary for CLI output
    pub fn summary(&self) -> String {
        let expected = self
            .metadata
            .expected
            .map(|e| e.to_string())
            .unwrap_or_else(|| "?".to_string());

        format!(
            "{}: {} of {} records → {} ({:.1}s, sha256 {})",
            self.metadata.record_class,
            self.metadata.extracted,
            expected,
            self.artifact.location,
            self.metadata.elapsed_secs().unwrap_or_default(),
            &self.artifact.checksum[..self.artifact.checksum.len().min(12)]
        )
    }
}
