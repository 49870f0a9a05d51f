//! Sheet loading for clarity ingest.
//!
//! Turns an uploaded CSV or workbook into one [`RawSheet`](clarity_model::RawSheet)
//! per sheet. No header row is assumed; header discovery happens downstream.

pub mod delimited;
pub mod error;
pub mod loader;
pub mod workbook;

pub use delimited::{parse_csv, strip_bom};
pub use error::{IngestError, Result};
pub use loader::{
    LoadedUpload, MAX_UPLOAD_SIZE, UploadFormat, check_file_size_with_limit, load_upload,
    load_upload_with_limit, sha256_hex,
};
pub use workbook::{convert_cell, read_workbook};
