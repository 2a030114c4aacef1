//! Port traits implemented by infrastructure crates.
//!
//! The runner drives the pipeline entirely through these three traits; it
//! never sees HTTP, file handles, or CSV framing. Implementations live in the
//! `vision` and `records` crates.

use async_trait::async_trait;

use crate::{AnalysisError, Caption, ImageUrl, InputRecord, OutputRecord, SinkError, SourceError, Tag};

// ---------------------------------------------------------------------------
// Remote analysis port
// ---------------------------------------------------------------------------

/// The remote image-analysis capability.
///
/// Both operations take the same URL; the pipeline calls them as one
/// composite step raced against the per-record timeout.
#[async_trait]
pub trait ImageAnalyzer: Send + Sync {
    /// Obtains the best caption for the image at `url`.
    ///
    /// Implementations use only the first (highest-ranked) caption candidate
    /// the service returns; an empty candidate list is a
    /// [`AnalysisError::MalformedResponse`].
    async fn describe(&self, url: &ImageUrl) -> Result<Caption, AnalysisError>;

    /// Obtains the tag list for the image at `url`, in service order.
    ///
    /// The visual-feature filter is restricted to tags.
    async fn tag(&self, url: &ImageUrl) -> Result<Vec<Tag>, AnalysisError>;
}

// ---------------------------------------------------------------------------
// Record source port
// ---------------------------------------------------------------------------

/// Events produced by a record source.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordEvent {
    /// A well-formed input row was decoded.
    Record(InputRecord),
    /// The source is exhausted; no further calls will yield records.
    Eof,
}

/// Lazy, pull-based supplier of input records.
///
/// The pipeline calls [`next_record`](RecordSource::next_record) only after
/// the previous record's outcome has been fully handled, which is how the
/// one-record-in-flight backpressure guarantee is enforced.
#[async_trait]
pub trait RecordSource: Send {
    /// Decodes the next row from the source.
    ///
    /// Returns [`RecordEvent::Eof`] when no more data is available and `Err`
    /// on unrecoverable decode or I/O failures.
    async fn next_record(&mut self) -> Result<RecordEvent, SourceError>;

    /// Human-readable name for logging (e.g. `"csv"`).
    fn source_name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Record sink port
// ---------------------------------------------------------------------------

/// Append-only destination for output rows.
#[async_trait]
pub trait RecordSink: Send {
    /// Appends one row and flushes it before returning.
    ///
    /// The pipeline awaits this call before requesting the next input row, so
    /// a successful return means the row is durably handed to the sink.
    async fn append(&mut self, record: &OutputRecord) -> Result<(), SinkError>;
}
