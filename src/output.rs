//! Delimited row sink.
//!
//! Writes [`LogRow`]s as delimiter-separated lines (tab by default) with no
//! header. Rows of different shapes have different widths, so records are
//! flexible. Fields containing the delimiter, quotes or newlines are quoted.
//!
//! # Example
//!
//! ```rust
//! use chatvault::config::RowWriterConfig;
//! use chatvault::model::Emoji;
//! use chatvault::output::to_delimited;
//! use chatvault::row::{FixedClock, RowSerializer};
//! use chrono::{TimeZone, Utc};
//!
//! let serializer = RowSerializer::with_clock(FixedClock(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
//! let emoji = Emoji { id: "42".into(), name: "blob".into(), ..Emoji::default() };
//! let row = serializer.serialize("rest", "create", &emoji.into())?;
//!
//! let text = to_delimited(&[row], &RowWriterConfig::new())?;
//! assert_eq!(text, "2024-01-01T00:00:00.000000+00:00\trest\tcreate\temoji\t42\tblob\tnocolons\n");
//! # Ok::<(), chatvault::ArchiveError>(())
//! ```

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use crate::config::RowWriterConfig;
use crate::error::{ArchiveError, Result};
use crate::row::LogRow;

/// Appends rows to any writer.
pub struct RowWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> RowWriter<W> {
    /// Wraps `inner`, writing rows with the configured delimiter.
    pub fn new(inner: W, config: &RowWriterConfig) -> Self {
        let writer = csv::WriterBuilder::new()
            .delimiter(config.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_writer(inner);
        Self { writer }
    }

    /// Writes one row as one line.
    pub fn write_row(&mut self, row: &LogRow) -> Result<()> {
        self.writer.write_record(row.fields())?;
        Ok(())
    }

    /// Flushes buffered rows to the underlying writer.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| ArchiveError::Io(e.into_error()))
    }
}

impl RowWriter<File> {
    /// Opens `path` for appending, creating it if missing.
    pub fn append_to_path(path: impl AsRef<Path>, config: &RowWriterConfig) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;
        Ok(Self::new(file, config))
    }
}

/// Renders rows into a single string, one line per row.
pub fn to_delimited(rows: &[LogRow], config: &RowWriterConfig) -> Result<String> {
    let mut writer = RowWriter::new(Vec::new(), config);
    for row in rows {
        writer.write_row(row)?;
    }
    let bytes = writer.into_inner()?;
    String::from_utf8(bytes).map_err(|e| ArchiveError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Message, User};
    use crate::row::{FixedClock, RowSerializer};
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    fn serializer() -> RowSerializer<FixedClock> {
        RowSerializer::with_clock(FixedClock(
            Utc.with_ymd_and_hms(2024, 6, 15, 12, 30, 0).unwrap(),
        ))
    }

    fn message(content: &str) -> Message {
        Message {
            id: "100".into(),
            author: User {
                id: "7".into(),
                ..User::default()
            },
            content: content.into(),
            ..Message::default()
        }
    }

    #[test]
    fn test_multiline_content_is_quoted() {
        let row = serializer()
            .serialize("gateway", "create", &message("line one\nline two").into())
            .unwrap();
        let text = to_delimited(&[row], &RowWriterConfig::new()).unwrap();
        assert!(text.ends_with("\t\"line one\nline two\"\n"));
    }

    #[test]
    fn test_rows_of_different_width() {
        let s = serializer();
        let rows = vec![
            s.serialize("rest", "create", &message("hi").into()).unwrap(),
            s.serialize("rest", "create", &crate::model::Emoji::default().into())
                .unwrap(),
        ];
        let text = to_delimited(&rows, &RowWriterConfig::new()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].split('\t').count(), 9);
        assert_eq!(lines[1].split('\t').count(), 7);
    }

    #[test]
    fn test_append_to_path_keeps_existing_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.tsv");
        let row = serializer()
            .serialize("rest", "create", &message("hi").into())
            .unwrap();

        for _ in 0..2 {
            let mut writer = RowWriter::append_to_path(&path, &RowWriterConfig::new()).unwrap();
            writer.write_row(&row).unwrap();
            writer.flush().unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }
}
