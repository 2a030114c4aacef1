//! Append-mode CSV record sink.

use std::fs::{File, OpenOptions};
use std::path::Path;

use async_trait::async_trait;
use pipeline::{OutputRecord, RecordSink, SinkError};

use crate::OUTPUT_HEADER;

/// Appends output rows to a CSV file shared across the whole run.
///
/// The file is opened once in append mode; the fixed header is written only
/// when the file is new or empty, so interrupted runs can be pointed at the
/// same output file without duplicating the header.
pub struct CsvRecordSink {
    writer: csv::Writer<File>,
}

impl CsvRecordSink {
    /// Opens (or creates) `path` for appending, writing the header if needed.
    pub fn open_append(path: &Path) -> Result<Self, SinkError> {
        let needs_header = match std::fs::metadata(path) {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| SinkError::Io {
                message: format!("{}: {e}", path.display()),
            })?;

        // Headers are managed manually: serialize() must never emit a second
        // header when appending to a file that already has one.
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if needs_header {
            writer
                .write_record(OUTPUT_HEADER)
                .and_then(|()| writer.flush().map_err(Into::into))
                .map_err(|e| SinkError::Io {
                    message: format!("failed to write header: {e}"),
                })?;
        }

        Ok(Self { writer })
    }
}

#[async_trait]
impl RecordSink for CsvRecordSink {
    async fn append(&mut self, record: &OutputRecord) -> Result<(), SinkError> {
        self.writer
            .serialize(record)
            .and_then(|()| self.writer.flush().map_err(Into::into))
            .map_err(|e| SinkError::Io {
                message: format!("failed to append row: {e}"),
            })
    }
}
