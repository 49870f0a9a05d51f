//! Sheet classification and header mapping.
//!
//! [`classify`] picks the dataset type of a raw sheet by fingerprint;
//! [`locate_header`] finds its header row and resolves canonical columns.

#![deny(unsafe_code)]

pub mod classify;
pub mod error;
pub mod header;
pub mod options;

pub use classify::{ClassifiedSheet, classify, matches_fingerprint, sample_text};
pub use error::{MapError, Result};
pub use header::{HeaderKind, HeaderLayout, ResolvedColumn, locate_header};
pub use options::{
    CLASSIFIER_SAMPLE_ROWS, DEFAULT_SINGLE_ROW_THRESHOLD, DEFAULT_TWO_ROW_THRESHOLD,
    HEADER_SCAN_ROWS, HeaderThresholds, IngestOptions,
};
