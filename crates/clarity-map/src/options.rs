//! Tunables for classification and header discovery.

use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};

/// Rows rendered into the classifier's sample text.
pub const CLASSIFIER_SAMPLE_ROWS: usize = 20;
/// Rows searched for a header.
pub const HEADER_SCAN_ROWS: usize = 20;
/// Minimum resolved fraction for a single header row.
pub const DEFAULT_SINGLE_ROW_THRESHOLD: f64 = 0.5;
/// Minimum resolved fraction for a two-row header.
pub const DEFAULT_TWO_ROW_THRESHOLD: f64 = 0.6;

/// Fraction of canonical columns that must resolve for a header to qualify.
///
/// The two-row pass merges two rows and so needs a stricter bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeaderThresholds {
    pub single_row: f64,
    pub two_row: f64,
}

impl Default for HeaderThresholds {
    fn default() -> Self {
        Self {
            single_row: DEFAULT_SINGLE_ROW_THRESHOLD,
            two_row: DEFAULT_TWO_ROW_THRESHOLD,
        }
    }
}

impl HeaderThresholds {
    pub fn validate(&self) -> Result<()> {
        check_fraction("single_row", self.single_row)?;
        check_fraction("two_row", self.two_row)
    }
}

fn check_fraction(name: &'static str, value: f64) -> Result<()> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(MapError::InvalidThreshold { name, value })
    }
}

/// Options shared by the classifier and header locator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IngestOptions {
    pub thresholds: HeaderThresholds,
    pub header_scan_rows: usize,
    pub sample_rows: usize,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            thresholds: HeaderThresholds::default(),
            header_scan_rows: HEADER_SCAN_ROWS,
            sample_rows: CLASSIFIER_SAMPLE_ROWS,
        }
    }
}

impl IngestOptions {
    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate()?;
        if self.header_scan_rows == 0 {
            return Err(MapError::InvalidDepth {
                name: "header_scan_rows",
            });
        }
        if self.sample_rows == 0 {
            return Err(MapError::InvalidDepth { name: "sample_rows" });
        }
        Ok(())
    }
}
