//! Error types for the VisionRow domain, one enum per layer boundary.
//!
//! [`AnalysisError`], [`SourceError`], and [`SinkError`] are produced by the
//! infrastructure adapters behind the corresponding port traits.
//! [`VisionRowError`] covers conditions that halt the pipeline itself: a
//! per-record analysis failure is recovered into an error output row and never
//! becomes a [`VisionRowError`], while source and sink failures do.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Adapter-level errors
// ---------------------------------------------------------------------------

/// Failure of one remote analysis call (describe or tag).
///
/// Always recovered by the pipeline into an error output row for the record
/// being processed; never fatal to the run.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The request never produced an HTTP response (connect failure, TLS
    /// failure, mid-body disconnect).
    #[error("transport failure: {message}")]
    Transport {
        /// Description of the underlying transport problem.
        message: String,
    },

    /// The service answered with a non-success HTTP status.
    #[error("service returned status {status}")]
    Service {
        /// Numeric HTTP status code of the response.
        status: u16,
    },

    /// The response decoded but did not contain what the capability promises
    /// (no caption candidates, confidence outside `[0, 1]`, bad JSON shape).
    #[error("malformed response: {message}")]
    MalformedResponse {
        /// Description of what was missing or invalid.
        message: String,
    },
}

// ---------------------------------------------------------------------------

/// Failure of the record source.
///
/// Source failures are fatal: the pipeline cannot know how many rows remain,
/// so it stops rather than silently dropping input.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source's header row does not contain the required `URL` column.
    #[error("source has no URL column")]
    MissingUrlColumn,

    /// A row could not be decoded into an [`crate::InputRecord`].
    #[error("failed to decode source row {row}: {message}")]
    Decode {
        /// 1-based row number within the source (excluding the header).
        row: u64,
        /// Description of the decode problem.
        message: String,
    },

    /// The source itself could not be read (missing file, I/O error).
    #[error("failed to read source: {message}")]
    Io {
        /// Description of the underlying I/O problem.
        message: String,
    },
}

// ---------------------------------------------------------------------------

/// Failure to append one row to the sink.
///
/// Treated as fatal by the pipeline: once an append fails, the row-count
/// conservation guarantee can no longer be upheld for subsequent rows.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The sink could not be opened or written.
    #[error("failed to write sink: {message}")]
    Io {
        /// Description of the underlying I/O problem.
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Pipeline-level errors
// ---------------------------------------------------------------------------

/// Errors that halt the pipeline.
///
/// Distinct from per-record analysis failures, which are recovered locally:
/// these represent conditions under which continuing would drop input rows or
/// write to a broken sink.
#[derive(Debug, Error)]
pub enum VisionRowError {
    /// The row-decoding machinery itself failed (not a single bad record the
    /// pipeline could mark and move past).
    #[error("source failure: {0}")]
    Source(#[from] SourceError),

    /// An append to the sink failed.
    #[error("sink failure: {0}")]
    Sink(#[from] SinkError),

    /// The run configuration is invalid (bad endpoint, missing credential).
    ///
    /// Produced at startup; the pipeline never starts with an invalid config.
    #[error("configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },
}
