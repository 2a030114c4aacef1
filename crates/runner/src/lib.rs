//! VisionRow orchestration layer.
//!
//! [`RowPipeline`] drives the per-record step loop: pull one input row, race
//! the composite remote analysis against the per-record timeout, append the
//! success or error output row, and only then pull the next input row.
//!
//! ## Architectural Layer
//!
//! **Orchestration.** The executor sequences calls between the domain types
//! in the [`pipeline`] crate and the infrastructure ports
//! ([`pipeline::ImageAnalyzer`], [`pipeline::RecordSource`],
//! [`pipeline::RecordSink`]). It contains no transport or file-format rules
//! of its own.
//!
//! ## Concurrency model
//!
//! One logical task, at most one record in flight. The pull-based loop is
//! what enforces the backpressure guarantee: `next_record` is not called
//! again until the current record's output row has been appended and
//! flushed. When the timeout wins the race the analysis future is dropped,
//! so the losing remote call is truly cancelled rather than left running
//! with its result discarded; this bounds the worst-case wait per record.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{info, warn, Instrument};

use pipeline::{
    AnalysisError, Caption, ImageAnalyzer, ImageUrl, InputRecord, OutputRecord, RecordEvent,
    RecordSink, RecordSource, RunId, RunSummary, Tag, Timestamp, VisionRowError,
};

/// Default ceiling on one record's composite analysis call.
pub const DEFAULT_RECORD_TIMEOUT: Duration = Duration::from_millis(5000);

/// The sequential row pipeline.
///
/// Construct with [`new`](RowPipeline::new), optionally adjust the per-record
/// timeout with [`with_record_timeout`](RowPipeline::with_record_timeout),
/// then consume with [`run`](RowPipeline::run).
pub struct RowPipeline<S, K> {
    source: S,
    sink: K,
    analyzer: Arc<dyn ImageAnalyzer>,
    record_timeout: Duration,
    run_id: RunId,
}

impl<S: RecordSource, K: RecordSink> RowPipeline<S, K> {
    /// Wires a pipeline from its three collaborators.
    pub fn new(source: S, sink: K, analyzer: Arc<dyn ImageAnalyzer>) -> Self {
        Self {
            source,
            sink,
            analyzer,
            record_timeout: DEFAULT_RECORD_TIMEOUT,
            run_id: RunId::new_random(),
        }
    }

    /// Overrides the per-record analysis timeout.
    pub fn with_record_timeout(mut self, record_timeout: Duration) -> Self {
        self.record_timeout = record_timeout;
        self
    }

    /// Identifier of this run, for log correlation.
    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Processes every source row to completion.
    ///
    /// Per-record analysis failures (timeout, transport error, malformed
    /// response) are recovered into `ERROR` rows and do not stop the run.
    /// Source and sink failures are fatal and surface as [`VisionRowError`].
    pub async fn run(self) -> Result<RunSummary, VisionRowError> {
        let span = tracing::info_span!("pipeline_run", run_id = %self.run_id);
        self.run_inner().instrument(span).await
    }

    async fn run_inner(mut self) -> Result<RunSummary, VisionRowError> {
        let started_at = Timestamp::now();
        let mut rows_succeeded: u64 = 0;
        let mut rows_failed: u64 = 0;

        info!(source = self.source.source_name(), "pipeline started");

        loop {
            let record = match self.source.next_record().await? {
                RecordEvent::Record(record) => record,
                RecordEvent::Eof => break,
            };

            let row = self.analyze_record(&record).await;
            if row.is_error() {
                rows_failed += 1;
            } else {
                rows_succeeded += 1;
            }

            // Awaited before the next pull: a row is either durably appended
            // or the run stops here.
            self.sink.append(&row).await?;
        }

        let summary = RunSummary {
            run_id: self.run_id,
            rows_processed: rows_succeeded + rows_failed,
            rows_succeeded,
            rows_failed,
            started_at,
            finished_at: Timestamp::now(),
        };
        info!(
            rows_processed = summary.rows_processed,
            rows_failed = summary.rows_failed,
            "all done"
        );
        Ok(summary)
    }

    /// Runs the race for one record and formats its output row.
    ///
    /// Never fails: every analysis outcome maps to a success or error row.
    async fn analyze_record(&self, record: &InputRecord) -> OutputRecord {
        let url = &record.url;
        info!(image = url.file_name(), "analyzing image");

        match timeout(self.record_timeout, self.describe_and_tag(url)).await {
            Ok(Ok((caption, tags))) => {
                info!(
                    image = url.file_name(),
                    caption = %caption.text,
                    confidence = %caption.confidence,
                    tags = %pipeline::types::format_tags(&tags),
                    "image analyzed"
                );
                OutputRecord::success(url, &caption, &tags)
            }
            Ok(Err(err)) => {
                warn!(url = %url, error = %err, "analysis failed");
                OutputRecord::error(url)
            }
            Err(_elapsed) => {
                warn!(
                    url = %url,
                    timeout_ms = self.record_timeout.as_millis() as u64,
                    "analysis timed out"
                );
                OutputRecord::error(url)
            }
        }
    }

    /// The composite remote call: caption first, then tags, same URL.
    async fn describe_and_tag(
        &self,
        url: &ImageUrl,
    ) -> Result<(Caption, Vec<Tag>), AnalysisError> {
        let caption = self.analyzer.describe(url).await?;
        let tags = self.analyzer.tag(url).await?;
        Ok((caption, tags))
    }
}
