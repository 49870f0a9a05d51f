#![deny(unsafe_code)]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cell::CellValue;
use crate::dataset::{SITE_ID, STUDY_NAME, SUBJECT_ID};
use crate::ids::DatasetId;

/// Canonical column to cleaned scalar value. Absent keys read as null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRow {
    pub cells: BTreeMap<String, CellValue>,
}

impl NormalizedRow {
    pub fn get(&self, column: &str) -> &CellValue {
        const EMPTY: &CellValue = &CellValue::Empty;
        self.cells.get(column).unwrap_or(EMPTY)
    }

    pub fn set(&mut self, column: impl Into<String>, value: CellValue) {
        self.cells.insert(column.into(), value);
    }

    /// Text of a column, or `None` when the cell is blank.
    pub fn text(&self, column: &str) -> Option<String> {
        self.get(column).as_text_non_blank()
    }

    pub fn subject_id(&self) -> Option<String> {
        self.text(SUBJECT_ID)
    }
}

/// The rows extracted from one sheet, ready for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTable {
    pub dataset: DatasetId,
    /// Destination table name.
    pub table: String,
    /// Resolved canonical columns, in synonym-table order.
    pub columns: Vec<String>,
    pub rows: Vec<NormalizedRow>,
}

impl NormalizedTable {
    pub fn new(dataset: DatasetId, table: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            dataset,
            table: table.into(),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: NormalizedRow) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}

/// Participant entity that fact rows reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub subject_id: String,
    pub site_id: Option<String>,
    pub study_name: Option<String>,
}

impl Subject {
    pub fn new(subject_id: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
            site_id: None,
            study_name: None,
        }
    }

    /// Builds a subject from a normalized row, taking site and study when present.
    pub fn from_row(row: &NormalizedRow) -> Option<Self> {
        let subject_id = row.subject_id()?;
        Some(Self {
            subject_id,
            site_id: row.text(SITE_ID),
            study_name: row.text(STUDY_NAME),
        })
    }
}
