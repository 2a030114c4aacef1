//! Core domain for VisionRow.
//!
//! This crate contains every domain concept, newtype identifier, shared value
//! type, port trait, and cross-cutting error type used throughout the row
//! pipeline. Infrastructure crates implement the traits defined here; they
//! never add domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; infrastructure crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`ImageUrl`, `RunId`) |
//! | [`types`] | Value types (`Confidence`, `Caption`, `Tag`, `OutputRecord`, etc.) |
//! | [`traits`] | Port traits (`ImageAnalyzer`, `RecordSource`, `RecordSink`) |
//! | [`errors`] | Per-layer and pipeline-level error types |

pub mod errors;
pub mod identifiers;
pub mod traits;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use errors::{AnalysisError, SinkError, SourceError, VisionRowError};
pub use identifiers::{ImageUrl, RunId};
pub use traits::{ImageAnalyzer, RecordEvent, RecordSink, RecordSource};
pub use types::{Caption, Confidence, InputRecord, OutputRecord, RunSummary, Tag, Timestamp};
