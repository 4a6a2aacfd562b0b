//! CSV sink; flushes after every batch so partial walks stay readable.

use super::{row, ResultsSink, HEADERS};
use crate::catalog::ProductRecord;
use crate::error::SinkError;
use std::fs::File;
use std::path::Path;
use tracing::debug;

pub struct CsvSink {
    writer: Option<csv::Writer<File>>,
    rows: usize,
}

impl CsvSink {
    /// Creates (or truncates) `path` and writes the header row.
    pub fn create(path: &Path) -> Result<Self, SinkError> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(HEADERS)?;
        writer.flush()?;
        debug!("Opened CSV sink at {}", path.display());
        Ok(Self { writer: Some(writer), rows: 0 })
    }
}

impl ResultsSink for CsvSink {
    fn write_batch(&mut self, records: &[ProductRecord]) -> Result<(), SinkError> {
        let writer = self.writer.as_mut().ok_or(SinkError::Closed)?;
        for record in records {
            writer.write_record(row(record).iter().map(|cell| cell.to_field()))?;
            self.rows += 1;
        }
        writer.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        let mut writer = self.writer.take().ok_or(SinkError::Closed)?;
        writer.flush()?;
        Ok(())
    }

    fn rows_written(&self) -> usize {
        self.rows
    }
}
