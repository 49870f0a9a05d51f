//! CSV uploads as a single headerless sheet.

use std::path::Path;

use clarity_model::{CellValue, DEFAULT_SHEET_NAME, RawSheet};

use crate::error::{IngestError, Result};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Strips a UTF-8 BOM and rejects UTF-16 input.
pub fn strip_bom<'a>(path: &Path, bytes: &'a [u8]) -> Result<&'a [u8]> {
    if let Some(rest) = bytes.strip_prefix(UTF8_BOM) {
        return Ok(rest);
    }
    match bytes.get(0..2) {
        Some([0xFF, 0xFE]) => Err(IngestError::UnsupportedEncoding {
            path: path.to_path_buf(),
            encoding: "UTF-16 LE",
        }),
        Some([0xFE, 0xFF]) => Err(IngestError::UnsupportedEncoding {
            path: path.to_path_buf(),
            encoding: "UTF-16 BE",
        }),
        _ => Ok(bytes),
    }
}

/// Parses CSV bytes into one sheet named `Sheet1`.
///
/// No row is treated as a header and rows keep their own lengths. Empty
/// fields become empty cells; everything else stays text.
pub fn parse_csv(path: &Path, bytes: &[u8]) -> Result<RawSheet> {
    let body = strip_bom(path, bytes)?;
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(IngestError::EmptyFile {
            path: path.to_path_buf(),
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        rows.push(record.iter().map(CellValue::from).collect());
    }

    tracing::debug!(path = %path.display(), rows = rows.len(), "parsed CSV upload");
    Ok(RawSheet::new(DEFAULT_SHEET_NAME, rows))
}
