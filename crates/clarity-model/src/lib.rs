pub mod cell;
pub mod dataset;
pub mod error;
pub mod ids;
pub mod outcome;
pub mod row;
pub mod sheet;

pub use cell::CellValue;
pub use dataset::{
    CanonicalColumn, ColumnSynonymMap, DatasetTypeSpec, SITE_ID, STUDY_NAME, SUBJECT_ID,
};
pub use error::{ModelError, Result};
pub use ids::DatasetId;
pub use outcome::{
    ErrorKind, FileReport, FileStatus, NO_VALID_DATASET_REASON, OutcomeStatus, SheetOutcome,
};
pub use row::{NormalizedRow, NormalizedTable, Subject};
pub use sheet::{DEFAULT_SHEET_NAME, RawSheet};
