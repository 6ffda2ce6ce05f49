//! CSV payload parser.
//!
//! Turns the body of a spreadsheet export into [`RawRow`]s:
//! - Line 1 is the header; header names are trimmed
//! - Quoted cells may span several lines
//! - Ragged rows are tolerated (short rows lack columns, extra cells are dropped)
//! - Blank lines and all-blank rows are skipped

use csv::{ReaderBuilder, StringRecord, Trim};
use showcase_shared::{RawRow, Result, ShowcaseError};

/// UTF-8 byte order mark some spreadsheet exports prepend.
const BOM: char = '\u{feff}';

/// Decode a response body and parse it as CSV.
pub(crate) fn parse_csv_bytes(body: &[u8]) -> Result<Vec<RawRow>> {
    let text = std::str::from_utf8(body).map_err(|e| {
        ShowcaseError::parse(format!(
            "feed is not valid UTF-8 text (invalid byte at offset {})",
            e.valid_up_to()
        ))
    })?;
    parse_csv(text)
}

/// Parse CSV text with a header row into rows, in file order.
pub fn parse_csv(text: &str) -> Result<Vec<RawRow>> {
    let text = text.strip_prefix(BOM).unwrap_or(text);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(text.as_bytes());

    let headers = reader.headers().map_err(csv_error)?.clone();
    let mut rows = Vec::new();

    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        let row = to_row(&headers, &record);
        if row.is_blank() {
            continue;
        }
        rows.push(row);
    }

    Ok(rows)
}

fn to_row(headers: &StringRecord, record: &StringRecord) -> RawRow {
    headers
        .iter()
        .zip(record.iter())
        .filter(|(name, _)| !name.is_empty())
        .collect()
}

fn csv_error(e: csv::Error) -> ShowcaseError {
    match e.position() {
        Some(pos) => ShowcaseError::parse(format!("line {}: {e}", pos.line())),
        None => ShowcaseError::parse(e.to_string()),
    }
}
