//! Results sinks: persist product records as spreadsheet rows.

mod delimited;
mod workbook;

pub use delimited::CsvSink;
pub use workbook::XlsxSink;

use crate::catalog::ProductRecord;
use crate::config::OutputFormat;
use crate::error::SinkError;
use serde_json::Value;
use std::path::Path;

/// Header row, one entry per exported column.
pub const HEADERS: [&str; 11] = [
    "id",
    "SKU",
    "product name",
    "brand",
    "image URL (300)",
    "image URL (900)",
    "list price",
    "retail price",
    "sale price",
    "stock status",
    "gender",
];

/// Destination for batches of records. Owns its own row cursor.
pub trait ResultsSink {
    /// Appends records after the rows already written.
    fn write_batch(&mut self, records: &[ProductRecord]) -> Result<(), SinkError>;

    /// Flushes and closes the output. Further writes fail with [`SinkError::Closed`].
    fn finish(&mut self) -> Result<(), SinkError>;

    /// Data rows written so far, excluding the header.
    fn rows_written(&self) -> usize;
}

/// Opens a file sink of the given format, writing the header row.
pub fn open(format: OutputFormat, path: &Path) -> Result<Box<dyn ResultsSink>, SinkError> {
    Ok(match format {
        OutputFormat::Xlsx => Box::new(XlsxSink::create(path)?),
        OutputFormat::Csv => Box::new(CsvSink::create(path)?),
    })
}

/// A single spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Empty,
}

impl Cell {
    fn text(value: &Option<String>) -> Self {
        value.as_ref().map_or(Cell::Empty, |s| Cell::Text(s.clone()))
    }

    fn value(value: &Option<Value>) -> Self {
        match value {
            None | Some(Value::Null) => Cell::Empty,
            Some(Value::Number(n)) => n.as_f64().map_or_else(|| Cell::Text(n.to_string()), Cell::Number),
            Some(Value::String(s)) => Cell::Text(s.clone()),
            Some(other) => Cell::Text(other.to_string()),
        }
    }

    /// Rendering used by text-based formats.
    pub fn to_field(&self) -> String {
        match self {
            Cell::Number(n) => n.to_string(),
            Cell::Text(s) => s.clone(),
            Cell::Empty => String::new(),
        }
    }
}

/// Cells of one record in [`HEADERS`] order.
pub fn row(record: &ProductRecord) -> [Cell; 11] {
    [
        Cell::Number(record.id as f64),
        Cell::Text(record.sku.clone()),
        Cell::value(&record.name),
        Cell::text(&record.brand_designer),
        Cell::value(&record.img),
        Cell::value(&record.zoom_img),
        Cell::value(&record.list_price),
        Cell::value(&record.retail_price),
        Cell::value(&record.sale_price),
        Cell::value(&record.stock_warn),
        Cell::value(&record.gender),
    ]
}

/// In-memory sink, for embedding and tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub batches: Vec<Vec<ProductRecord>>,
    pub finished: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records in write order.
    pub fn records(&self) -> impl Iterator<Item = &ProductRecord> {
        self.batches.iter().flatten()
    }
}

impl ResultsSink for MemorySink {
    fn write_batch(&mut self, records: &[ProductRecord]) -> Result<(), SinkError> {
        if self.finished {
            return Err(SinkError::Closed);
        }
        self.batches.push(records.to_vec());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.finished = true;
        Ok(())
    }

    fn rows_written(&self) -> usize {
        self.records().count()
    }
}
