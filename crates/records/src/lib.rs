//! VisionRow CSV infrastructure adapter.
//!
//! Implements the [`pipeline::RecordSource`] and [`pipeline::RecordSink`]
//! traits over header-driven CSV files using the `csv` crate, which supplies
//! RFC 4180 quoting so tag lists containing `", "` survive a round trip.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** File handling, header detection, and CSV framing all
//! live here. The [`pipeline`] crate sees only the port traits.

mod sink;
mod source;

pub use sink::CsvRecordSink;
pub use source::CsvRecordSource;

/// Column header carrying the image locator in the input file.
pub const URL_COLUMN: &str = "URL";

/// Output header, written once when the sink file is new or empty.
pub const OUTPUT_HEADER: [&str; 4] = ["URL", "DESCRIPTION", "CONFIDENCE", "TAGS"];
