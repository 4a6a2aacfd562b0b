//! XLSX workbook sink.

use super::{row, Cell, ResultsSink, HEADERS};
use crate::catalog::ProductRecord;
use crate::error::SinkError;
use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook, Worksheet};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing::debug;

const SHEET_NAME: &str = "Products";

/// Buffers rows in a worksheet and writes the workbook on [`ResultsSink::finish`].
pub struct XlsxSink {
    path: PathBuf,
    worksheet: Option<Worksheet>,
    /// Last row written; row 0 holds the header
    row: RowNum,
}

impl XlsxSink {
    pub fn create(path: &Path) -> Result<Self, SinkError> {
        let mut worksheet = Worksheet::new();
        worksheet.set_name(SHEET_NAME)?;

        let bold = Format::new().set_bold();
        for (col, title) in HEADERS.iter().enumerate() {
            worksheet.write_string_with_format(0, col as ColNum, *title, &bold)?;
        }

        // Fail early on an unwritable destination. An existing workbook stays
        // intact until `finish` replaces it.
        OpenOptions::new().append(true).create(true).open(path)?;

        Ok(Self { path: path.to_path_buf(), worksheet: Some(worksheet), row: 0 })
    }
}

impl ResultsSink for XlsxSink {
    fn write_batch(&mut self, records: &[ProductRecord]) -> Result<(), SinkError> {
        let worksheet = self.worksheet.as_mut().ok_or(SinkError::Closed)?;

        for record in records {
            self.row += 1;
            for (col, cell) in row(record).into_iter().enumerate() {
                let col = col as ColNum;
                match cell {
                    Cell::Number(n) => {
                        worksheet.write_number(self.row, col, n)?;
                    }
                    Cell::Text(s) => {
                        worksheet.write_string(self.row, col, s)?;
                    }
                    Cell::Empty => {}
                }
            }
        }

        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        let worksheet = self.worksheet.take().ok_or(SinkError::Closed)?;

        let mut workbook = Workbook::new();
        workbook.push_worksheet(worksheet);
        workbook.save(&self.path)?;

        debug!("Saved {} rows to {}", self.row, self.path.display());
        Ok(())
    }

    fn rows_written(&self) -> usize {
        self.row as usize
    }
}
