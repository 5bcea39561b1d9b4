//! Reads the numeric tables of Norges Bank's monetary policy report.
//!
//! The core works on already rendered pages: [`locate_table`] finds a table's
//! page by its marker phrases, [`select_rows`] keeps the meaningful rows of the
//! page's grid and [`normalize_cell`] turns each cell into a value token.
//! [`extract`] runs that for every [`TableSpec`]. The PDF helpers render pages
//! with `lopdf` and `pdf-extract` for callers that start from a file.

mod csv_out;
mod error;
mod extract;
mod locate;
mod merge;
mod model;
mod normalize;
mod options;
mod pdf_reader;
mod registry;
mod schedule;
mod select;
mod table_detect;
mod table_parse;
mod warning;

use std::path::Path;

pub use csv_out::{document_to_csv_string, document_to_json, write_document_csv};
pub use error::ExtractError;
pub use extract::{Extraction, ExtractionReport, TableLocation, extract, extract_with_report};
pub use locate::{MarkerSet, locate_table, locate_with_markers};
pub use model::{Page, PageSource, ParsedDocument, ParsedTable, RawGrid, RawRow, TableId};
pub use normalize::{MISSING_VALUE, normalize_cell};
pub use options::{ExtractOptions, GridChoice, PageSelection};
pub use pdf_reader::{read_pdf_pages, read_pdf_pages_from_bytes};
pub use registry::{ACTUAL_ROW_LABEL, RowPolicy, RowWhitelists, TableSpec, default_registry};
pub use schedule::{REPORT_PAGE_BASE_URL, ReportId, next_report, report_page_url};
pub use select::{MIN_ROW_CELLS, RowSelection, SelectedRow, SelectedRows, header_columns, select_rows};
pub use warning::{ExtractWarning, WarningCode};

/// Reads `input_pdf` and extracts the tables of `specs` from it.
pub fn extract_pdf(
    input_pdf: &Path,
    specs: &[TableSpec],
    whitelists: &RowWhitelists,
    options: &ExtractOptions,
) -> Result<Extraction, ExtractError> {
    let pages = read_pdf_pages(input_pdf, options.pages.as_ref())?;
    extract_with_report(&pages, specs, whitelists, options.grid_choice)
}

/// [`extract_pdf`] for a document already held in memory.
pub fn extract_pdf_bytes(
    input_pdf: &[u8],
    specs: &[TableSpec],
    whitelists: &RowWhitelists,
    options: &ExtractOptions,
) -> Result<Extraction, ExtractError> {
    let pages = read_pdf_pages_from_bytes(input_pdf, options.pages.as_ref())?;
    extract_with_report(&pages, specs, whitelists, options.grid_choice)
}
