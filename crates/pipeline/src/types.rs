//! Shared value types for the VisionRow domain.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! meaningful values with invariants (confidence scores are in `[0.0, 1.0]`)
//! and own the output-row formatting rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ImageUrl;

/// The literal written into every field of an error output row.
pub const ERROR_MARKER: &str = "ERROR";

// ---------------------------------------------------------------------------
// Score types
// ---------------------------------------------------------------------------

/// A confidence score in the range `[0.0, 1.0]`, as reported by the analysis
/// service for a caption or a tag.
///
/// Output rows render confidences with exactly two decimal places; `Display`
/// is the single place that formatting rule lives.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Confidence(f64);

impl Confidence {
    /// Creates a [`Confidence`], returning `None` if `value` is outside the
    /// valid range `[0.0, 1.0]` or not finite.
    #[must_use]
    pub fn new(value: f64) -> Option<Self> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Returns the score as an `f64` in `[0.0, 1.0]`.
    pub fn as_f64(self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Analysis results
// ---------------------------------------------------------------------------

/// The best caption the analysis service produced for one image.
///
/// The describe capability may return several candidate captions; only the
/// first (highest-ranked) one becomes a [`Caption`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Caption {
    /// Human-readable description of the image.
    pub text: String,
    /// Service-reported confidence in the caption.
    pub confidence: Confidence,
}

/// One tag the analysis service assigned to an image.
///
/// Tags keep the order the service returned them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag label (e.g. `"cat"`).
    pub name: String,
    /// Service-reported confidence in the tag.
    pub confidence: Confidence,
}

// ---------------------------------------------------------------------------
// Pipeline records
// ---------------------------------------------------------------------------

/// One decoded source row: the image to analyze.
#[derive(Debug, Clone, PartialEq)]
pub struct InputRecord {
    /// Locator of the image this row refers to.
    pub url: ImageUrl,
}

/// One row appended to the sink, already formatted for serialisation.
///
/// Built via [`OutputRecord::success`] or [`OutputRecord::error`]; all four
/// fields are plain strings by the time this type exists, so the sink never
/// re-applies domain formatting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRecord {
    /// The input URL, echoed verbatim.
    pub url: String,
    /// Caption text, or [`ERROR_MARKER`].
    pub description: String,
    /// Caption confidence with two decimal places, or [`ERROR_MARKER`].
    pub confidence: String,
    /// `"name (confidence)"` pairs joined with `", "`, or [`ERROR_MARKER`].
    pub tags: String,
}

impl OutputRecord {
    /// Builds the success row for one analyzed image.
    pub fn success(url: &ImageUrl, caption: &Caption, tags: &[Tag]) -> Self {
        Self {
            url: url.as_str().to_string(),
            description: caption.text.clone(),
            confidence: caption.confidence.to_string(),
            tags: format_tags(tags),
        }
    }

    /// Builds the error row for an image whose analysis failed or timed out.
    pub fn error(url: &ImageUrl) -> Self {
        Self {
            url: url.as_str().to_string(),
            description: ERROR_MARKER.to_string(),
            confidence: ERROR_MARKER.to_string(),
            tags: ERROR_MARKER.to_string(),
        }
    }

    /// Returns `true` if this is an error marker row.
    pub fn is_error(&self) -> bool {
        self.description == ERROR_MARKER
    }
}

/// Renders a tag list as `"cat (0.98), animal (0.76)"`.
///
/// An empty list renders as the empty string.
pub fn format_tags(tags: &[Tag]) -> String {
    tags.iter()
        .map(|tag| format!("{} ({})", tag.name, tag.confidence))
        .collect::<Vec<_>>()
        .join(", ")
}

// ---------------------------------------------------------------------------
// Run accounting
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly; the underlying representation can change without affecting the
/// domain API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a [`Timestamp`] from a [`DateTime<Utc>`].
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the underlying [`DateTime<Utc>`].
    pub fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

// ---------------------------------------------------------------------------

/// Outcome counters for one completed pipeline run.
///
/// Every decoded row lands in exactly one of `rows_succeeded` or
/// `rows_failed`; `rows_processed` is their sum and must equal the number of
/// rows appended to the sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Identifier of the run these counters belong to.
    pub run_id: crate::RunId,
    /// Total rows decoded and appended.
    pub rows_processed: u64,
    /// Rows whose analysis completed within the timeout.
    pub rows_succeeded: u64,
    /// Rows written as error marker rows.
    pub rows_failed: u64,
    /// When the run started.
    pub started_at: Timestamp,
    /// When the run finished.
    pub finished_at: Timestamp,
}
