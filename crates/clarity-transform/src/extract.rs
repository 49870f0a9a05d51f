//! Row extraction below a located header.

use clarity_map::HeaderLayout;
use clarity_model::{
    CellValue, DatasetTypeSpec, NormalizedRow, NormalizedTable, RawSheet, SUBJECT_ID,
};
use serde::Serialize;
use tracing::debug;

use crate::normalization::{normalize_subject_id, nullify_blank};

const MISSING: &CellValue = &CellValue::Empty;

/// Rows extracted from one sheet plus what was dropped on the way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extraction {
    pub table: NormalizedTable,
    /// Rows below the header in the grid, before any filtering.
    pub data_rows: usize,
    /// Rows without a subject identifier.
    pub dropped_missing_subject: usize,
}

impl Extraction {
    /// True when the grid had nothing below the header.
    pub fn has_no_data(&self) -> bool {
        self.data_rows == 0
    }
}

/// Builds normalized rows from the grid region below `layout.header_row`.
///
/// Each resolved canonical column reads the cell at its index; cells past
/// the end of a ragged row are null. When `subject_id` is resolved, rows
/// without one are dropped and the rest carry the normalized identifier.
pub fn extract_rows(sheet: &RawSheet, layout: &HeaderLayout, spec: &DatasetTypeSpec) -> Extraction {
    let columns = layout.column_names();
    let mut table = NormalizedTable::new(spec.id.clone(), spec.table.clone(), columns);
    let has_subject = layout.column_index(SUBJECT_ID).is_some();

    let start = layout.data_start().min(sheet.height());
    let data = &sheet.rows[start..];
    let mut dropped_missing_subject = 0;

    for cells in data {
        let mut row = NormalizedRow::default();
        for column in &layout.columns {
            let raw = cells.get(column.index).unwrap_or(MISSING);
            let value = if column.name == SUBJECT_ID {
                normalize_subject_id(raw).map_or(CellValue::Empty, CellValue::Text)
            } else {
                nullify_blank(raw)
            };
            row.set(column.name.clone(), value);
        }

        if has_subject && row.subject_id().is_none() {
            dropped_missing_subject += 1;
            continue;
        }
        table.push_row(row);
    }

    debug!(
        dataset = %spec.id,
        data_rows = data.len(),
        kept = table.len(),
        dropped_missing_subject,
        "extracted rows"
    );
    Extraction {
        table,
        data_rows: data.len(),
        dropped_missing_subject,
    }
}
