//! Extraction pipeline
//!
//! Walks a record class's catalog page by page, fetches the detail payload of
//! every entry, reshapes it and hands the accumulated records to a [`Sink`]
//! once the last page has been processed.
//!
//! Steps per class:
//! 1. Fetch the catalog page (a failure aborts the run, nothing is written)
//! 2. Fetch detail payloads for the page's entries, bounded by `concurrency`
//! 3. Transform the payloads that arrived and append them in catalog order
//! 4. Follow `next` until the catalog ends
//! 5. Stamp run metadata and write the artifact

use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use tracing::{debug, error, info, info_span, Instrument};

use crate::config::ExtractConfig;
use crate::error::ExtractError;
use crate::fetcher::DetailFetcher;
use crate::models::{NormalizedRecord, Page, RecordClass};
use crate::report::{RunMetadata, RunReport};
use crate::sink::{JsonFileSink, Sink};
use crate::transform::transform;
use crate::transport::{HttpTransport, Transport};

/// Records and accounting of a fully walked catalog, not yet persisted
#[derive(Debug, Clone)]
pub struct Extraction {
    pub records: Vec<NormalizedRecord>,
    pub metadata: RunMetadata,
}

/// Driver states between `Start` and the terminal `Done`/`Aborted`.
/// `Aborted` is the early `Err` return out of `FetchingPage`.
enum DriverState {
    FetchingPage { locator: String },
    ProcessingPage { locator: String, page: Page },
    Advancing { next: Option<String> },
    Done,
}

pub struct ExtractionPipeline {
    config: ExtractConfig,
    transport: Arc<dyn Transport>,
    sink: Arc<dyn Sink>,
}

impl ExtractionPipeline {
    pub fn new(config: ExtractConfig, transport: Arc<dyn Transport>, sink: Arc<dyn Sink>) -> Self {
        Self {
            config,
            transport,
            sink,
        }
    }

    /// Pipeline over HTTP writing JSON artifacts into `config.output_dir`
    pub fn with_http(config: ExtractConfig) -> Result<Self, ExtractError> {
        config.validate()?;
        let transport = Arc::new(HttpTransport::new(&config)?);
        let sink = Arc::new(JsonFileSink::new(config.output_dir.clone()));
        Ok(Self::new(config, transport, sink))
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Extract one record class and write its artifact
    pub async fn run(&self, class: RecordClass) -> Result<RunReport, ExtractError> {
        let span = info_span!("extract", record_class = %class);
        self.run_and_write(class).instrument(span).await
    }

    async fn run_and_write(&self, class: RecordClass) -> Result<RunReport, ExtractError> {
        let extraction = match self.extract(class).await {
            Ok(extraction) => extraction,
            Err(e) => {
                error!(error = %e, "Extraction aborted; no artifact written");
                return Err(e);
            },
        };

        let artifact = match self.sink.write(class.artifact_name(), &extraction.records).await {
            Ok(artifact) => artifact,
            Err(source) => {
                let e = ExtractError::Write {
                    artifact: class.artifact_name().to_string(),
                    source,
                };
                error!(error = %e, "Artifact write failed");
                return Err(e);
            },
        };

        Ok(RunReport {
            metadata: extraction.metadata,
            artifact,
        })
    }

    /// Run several classes as independent pipelines.
    ///
    /// Results come back in input order; one class failing has no effect on
    /// the others.
    pub async fn run_all(
        &self,
        classes: &[RecordClass],
    ) -> Vec<(RecordClass, Result<RunReport, ExtractError>)> {
        let runs = classes
            .iter()
            .map(|&class| async move { (class, self.run(class).await) });

        join_all(runs).await
    }

    /// Walk the catalog of `class` and transform every retrievable entry
    pub async fn extract(&self, class: RecordClass) -> Result<Extraction, ExtractError> {
        let mut metadata = RunMetadata::start(class);
        let fetcher = DetailFetcher::new(self.transport.as_ref(), self.config.concurrency);
        let progress = self.progress_bar(class);

        let mut records: Vec<NormalizedRecord> = Vec::new();
        let mut expected: Option<u64> = None;
        let mut pages = 0usize;

        info!(
            record_class = %class,
            concurrency = self.config.concurrency,
            "Starting extraction"
        );

        let mut state = DriverState::FetchingPage {
            locator: self.config.catalog_url(class),
        };

        loop {
            state = match state {
                DriverState::FetchingPage { locator } => {
                    debug!(locator = %locator, "Fetching catalog page");

                    let payload = self.transport.fetch(&locator).await.map_err(|source| {
                        progress.abandon();
                        ExtractError::PageFetch { class, source }
                    })?;

                    let page = Page::from_payload(payload).map_err(|source| {
                        progress.abandon();
                        ExtractError::MalformedPage {
                            class,
                            locator: locator.clone(),
                            source,
                        }
                    })?;

                    DriverState::ProcessingPage { locator, page }
                },
                DriverState::ProcessingPage { locator, page } => {
                    pages += 1;
                    expected = page.count;
                    if let Some(count) = page.count {
                        progress.set_length(count);
                    }

                    let locators = page.detail_locators(class);
                    let payloads = fetcher.fetch_all(&locators).await;

                    let before = records.len();
                    records.extend(
                        payloads
                            .into_iter()
                            .flatten()
                            .map(|payload| transform(&payload, class)),
                    );
                    let added = records.len() - before;
                    progress.inc(locators.len() as u64);

                    info!(
                        record_class = %class,
                        page = pages,
                        locator = %locator,
                        entries = locators.len(),
                        extracted = added,
                        total = records.len(),
                        "Processed catalog page"
                    );

                    if class.is_paginated() {
                        DriverState::Advancing { next: page.next }
                    } else {
                        DriverState::Done
                    }
                },
                DriverState::Advancing { next: Some(next) } => {
                    DriverState::FetchingPage { locator: next }
                },
                DriverState::Advancing { next: None } => DriverState::Done,
                DriverState::Done => break,
            };
        }

        progress.finish_and_clear();
        metadata.finish(records.len(), expected, pages);
        metadata.report();

        Ok(Extraction { records, metadata })
    }

    fn progress_bar(&self, class: RecordClass) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }

        let bar = ProgressBar::new(0);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{msg:>8} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})")
        {
            bar.set_style(style.progress_chars("#>-"));
        }
        bar.set_message(class.to_string());
        bar
    }
}
