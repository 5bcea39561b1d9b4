use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON encode error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to load PDF: {0}")]
    PdfLoad(#[from] lopdf::Error),

    #[error("invalid page selection: {0}")]
    InvalidPageSelection(String),

    #[error("unknown table id '{0}'")]
    InvalidTableId(String),

    #[error("invalid report identifier: {0}")]
    InvalidReportId(String),

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("no pages available after applying selection")]
    NoPagesSelected,

    #[error("invalid input: the document has no pages")]
    EmptyDocument,

    #[error("invalid input: table {table_id} {reason}")]
    InvalidTableSpec { table_id: String, reason: String },
}

impl ExtractError {
    /// Caller contract violations, as opposed to I/O or document failures.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::EmptyDocument | Self::InvalidTableSpec { .. })
    }
}
