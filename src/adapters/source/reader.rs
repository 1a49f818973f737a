//! CSV source file reading
//!
//! Streams raw rows out of the tabular source file. Header names are
//! trimmed and matched case-insensitively downstream ([`RawRow`] normalizes
//! keys), missing columns degrade to absent fields, and a malformed record
//! is a row-level error that never fails the file. The only fatal failure
//! is an unreadable file.

use crate::domain::{RawRow, Result, TabulaError};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Tabular source file handle
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
    delimiter: u8,
}

impl CsvSource {
    /// Create a source for the given file and delimiter
    pub fn new(path: impl AsRef<Path>, delimiter: u8) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            delimiter,
        }
    }

    /// Path of the source file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the file and stream its rows
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or unreadable, or its header
    /// row cannot be parsed. These abort the produce stage.
    pub fn rows(&self) -> Result<RowIter> {
        let file = File::open(&self.path).map_err(|e| {
            TabulaError::Source(format!(
                "cannot open source file {}: {e}",
                self.path.display()
            ))
        })?;

        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| {
                TabulaError::Source(format!(
                    "cannot read header row of {}: {e}",
                    self.path.display()
                ))
            })?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        tracing::info!(
            path = %self.path.display(),
            columns = ?headers,
            "Detected source columns"
        );

        Ok(RowIter {
            records: reader.into_records(),
            headers,
        })
    }
}

/// Streaming iterator over the rows of a [`CsvSource`]
pub struct RowIter {
    records: csv::StringRecordsIntoIter<File>,
    headers: Vec<String>,
}

impl std::fmt::Debug for RowIter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowIter")
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

impl RowIter {
    /// Column names detected in the header row
    pub fn headers(&self) -> &[String] {
        &self.headers
    }
}

impl Iterator for RowIter {
    type Item = Result<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            // Row-level error: the caller logs and skips this row
            Err(e) => return Some(Err(TabulaError::Source(e.to_string()))),
        };

        let row = self
            .headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| (header.clone(), value.to_string()))
            .collect();

        Some(Ok(row))
    }
}
