//! CSV record source.

use std::fs::File;
use std::path::Path;

use async_trait::async_trait;
use pipeline::{ImageUrl, InputRecord, RecordEvent, RecordSource, SourceError};

use crate::URL_COLUMN;

/// Reads input records from a header-driven CSV file, one row at a time.
///
/// The header is decoded eagerly at open time so a missing `URL` column is
/// reported before the pipeline starts, not on the first row.
pub struct CsvRecordSource {
    records: csv::StringRecordsIntoIter<File>,
    url_index: usize,
    /// 1-based row counter (header excluded), for error reporting.
    row: u64,
}

impl std::fmt::Debug for CsvRecordSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsvRecordSource")
            .field("url_index", &self.url_index)
            .field("row", &self.row)
            .finish_non_exhaustive()
    }
}

impl CsvRecordSource {
    /// Opens `path` and locates the `URL` column in its header row.
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            // Input files in the wild carry ragged trailing columns; only the
            // URL column is contractual.
            .flexible(true)
            .from_path(path)
            .map_err(|e| SourceError::Io {
                message: format!("{}: {e}", path.display()),
            })?;

        let url_index = reader
            .headers()
            .map_err(|e| SourceError::Io {
                message: format!("failed to read header: {e}"),
            })?
            .iter()
            .position(|column| column == URL_COLUMN)
            .ok_or(SourceError::MissingUrlColumn)?;

        tracing::debug!(path = %path.display(), url_index, "opened record source");
        Ok(Self {
            records: reader.into_records(),
            url_index,
            row: 0,
        })
    }
}

#[async_trait]
impl RecordSource for CsvRecordSource {
    async fn next_record(&mut self) -> Result<RecordEvent, SourceError> {
        let Some(result) = self.records.next() else {
            return Ok(RecordEvent::Eof);
        };
        self.row += 1;

        let record = result.map_err(|e| SourceError::Decode {
            row: self.row,
            message: e.to_string(),
        })?;

        let field = record.get(self.url_index).ok_or(SourceError::Decode {
            row: self.row,
            message: format!("row has no field at URL column index {}", self.url_index),
        })?;

        let url = ImageUrl::new(field).ok_or(SourceError::Decode {
            row: self.row,
            message: "empty URL field".into(),
        })?;

        Ok(RecordEvent::Record(InputRecord { url }))
    }

    fn source_name(&self) -> &str {
        "csv"
    }
}
