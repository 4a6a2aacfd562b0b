//! Typed errors for fetching, extracting and exporting catalog data.

use thiserror::Error;

/// Failure to pull a structured fragment out of a script block.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("marker {marker:?} not found")]
    MarkerNotFound { marker: &'static str },

    #[error("no balanced fragment after marker {marker:?}")]
    Unbalanced { marker: &'static str },

    #[error("malformed fragment after marker {marker:?}")]
    Malformed {
        marker: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure to persist rows. Always fatal for a walk.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    #[error("workbook error")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSV error")]
    Csv(#[from] csv::Error),

    #[error("sink already finished")]
    Closed,
}

/// Errors raised while scraping a listing or detail page.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("request to {url} failed")]
    Network {
        url: String,
        #[source]
        source: wreq::Error,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("could not parse data on {url}")]
    Parse {
        url: String,
        #[source]
        source: ExtractError,
    },

    #[error(transparent)]
    Sink(#[from] SinkError),
}

impl ScrapeError {
    /// Whether the walk must stop on this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ScrapeError::Sink(_))
    }

    /// One-line message including every underlying cause, for log lines.
    pub fn report(self) -> String {
        format!("{:#}", anyhow::Error::new(self))
    }
}
