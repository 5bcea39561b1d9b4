use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;

use crate::error::ExtractError;
use crate::merge::{MergedOutput, merge_document};
use crate::model::ParsedDocument;

fn write_records<W: Write>(
    writer: &mut csv::Writer<W>,
    merged: &MergedOutput,
) -> Result<(), ExtractError> {
    writer.write_record(&merged.headers)?;
    for row in &merged.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_document_csv(
    path: &Path,
    document: &ParsedDocument,
    delimiter: u8,
) -> Result<(), ExtractError> {
    let mut writer = WriterBuilder::new().delimiter(delimiter).from_path(path)?;
    write_records(&mut writer, &merge_document(document))
}

pub fn document_to_csv_string(
    document: &ParsedDocument,
    delimiter: u8,
) -> Result<String, ExtractError> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::<u8>::new());
    write_records(&mut writer, &merge_document(document))?;

    let bytes = writer
        .into_inner()
        .map_err(|error| ExtractError::Csv(error.into_error().into()))?;
    String::from_utf8(bytes)
        .map_err(|error| ExtractError::InvalidOption(format!("invalid utf-8 csv output: {error}")))
}

pub fn document_to_json(document: &ParsedDocument) -> Result<String, ExtractError> {
    Ok(serde_json::to_string_pretty(document)?)
}
