//! Upload entry point: format detection, size check, digest and parsing.

use std::fmt;
use std::path::Path;

use clarity_model::RawSheet;
use sha2::{Digest, Sha256};

use crate::delimited::parse_csv;
use crate::error::{IngestError, Result};
use crate::workbook::read_workbook;

/// Maximum upload size (500 MB).
pub const MAX_UPLOAD_SIZE: u64 = 500 * 1024 * 1024;

/// Source format of an upload, from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFormat {
    Csv,
    Workbook,
}

impl UploadFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(Self::Workbook),
            _ => Err(IngestError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            }),
        }
    }
}

impl fmt::Display for UploadFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => f.write_str("csv"),
            Self::Workbook => f.write_str("workbook"),
        }
    }
}

/// Sheets read from one upload, in source order.
#[derive(Debug, Clone)]
pub struct LoadedUpload {
    pub format: UploadFormat,
    pub sheets: Vec<RawSheet>,
    /// Hex SHA-256 of the file bytes.
    pub sha256: String,
}

/// Fails when the file is larger than `max_size`.
pub fn check_file_size_with_limit(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| IngestError::from_io(path, e))?;
    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }
    Ok(())
}

/// Hex SHA-256 of a byte slice.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Loads an upload with the default size limit.
pub fn load_upload(path: &Path) -> Result<LoadedUpload> {
    load_upload_with_limit(path, MAX_UPLOAD_SIZE)
}

/// Reads a CSV or workbook into untyped sheets with no header assumption.
pub fn load_upload_with_limit(path: &Path, max_size: u64) -> Result<LoadedUpload> {
    let format = UploadFormat::from_path(path)?;
    check_file_size_with_limit(path, max_size)?;

    let bytes = std::fs::read(path).map_err(|e| IngestError::from_io(path, e))?;
    let sha256 = sha256_hex(&bytes);

    let sheets = match format {
        UploadFormat::Csv => vec![parse_csv(path, &bytes)?],
        UploadFormat::Workbook => read_workbook(path)?,
    };

    tracing::info!(
        path = %path.display(),
        %format,
        sheets = sheets.len(),
        "loaded upload"
    );
    Ok(LoadedUpload {
        format,
        sheets,
        sha256,
    })
}
