//! Header discovery and column resolution.
//!
//! Upstream exports put their header anywhere in the first rows, sometimes
//! split over two rows (a group label above the field names). The locator
//! first looks for a single row that resolves enough canonical columns, and
//! only if none qualifies tries adjacent row pairs against a stricter bar.

use clarity_model::{CanonicalColumn, ColumnSynonymMap, RawSheet};
use serde::Serialize;
use tracing::trace;

use crate::options::HeaderThresholds;

/// Shape of the header that was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HeaderKind {
    Single,
    /// Field names on the header row, group labels on `label_row` above it.
    TwoRow { label_row: usize },
}

/// A canonical column and the grid column it was found in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedColumn {
    pub name: String,
    pub index: usize,
}

/// Where the header sits and how canonical columns map onto the grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderLayout {
    /// Data starts on the row after this one.
    pub header_row: usize,
    pub kind: HeaderKind,
    /// Resolved columns in synonym-table order.
    pub columns: Vec<ResolvedColumn>,
    /// Resolved canonical columns over total canonical columns.
    pub fraction: f64,
}

impl HeaderLayout {
    pub fn data_start(&self) -> usize {
        self.header_row + 1
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.index)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }
}

/// Trimmed, lower-cased text of every cell in a row.
fn row_keys(sheet: &RawSheet, row: usize) -> Vec<String> {
    sheet
        .row(row)
        .iter()
        .map(|cell| {
            if cell.is_blank() {
                String::new()
            } else {
                cell.to_text().trim().to_lowercase()
            }
        })
        .collect()
}

fn position(keys: &[String], key: &str) -> Option<usize> {
    keys.iter().position(|k| k == key)
}

/// First synonym (in declared order) present in the row, with its column.
fn resolve_in_row(column: &CanonicalColumn, keys: &[String]) -> Option<usize> {
    column
        .match_keys()
        .iter()
        .find_map(|synonym| position(keys, synonym))
}

/// First synonym present in either row; the lower row wins for that synonym.
fn resolve_in_pair(column: &CanonicalColumn, labels: &[String], fields: &[String]) -> Option<usize> {
    column
        .match_keys()
        .iter()
        .find_map(|synonym| position(fields, synonym).or_else(|| position(labels, synonym)))
}

fn fraction(resolved: usize, total: usize) -> f64 {
    resolved as f64 / total as f64
}

/// Locates the header of a classified sheet.
///
/// Returns `None` when no row (or row pair) within the first `scan_rows`
/// rows resolves enough canonical columns. Earliest qualifying row wins.
pub fn locate_header(
    sheet: &RawSheet,
    columns: &ColumnSynonymMap,
    thresholds: &HeaderThresholds,
    scan_rows: usize,
) -> Option<HeaderLayout> {
    let total = columns.len();
    if total == 0 {
        return None;
    }
    let depth = scan_rows.min(sheet.height());

    single_row_pass(sheet, columns, thresholds.single_row, depth)
        .or_else(|| two_row_pass(sheet, columns, thresholds.two_row, depth))
}

fn single_row_pass(
    sheet: &RawSheet,
    columns: &ColumnSynonymMap,
    threshold: f64,
    depth: usize,
) -> Option<HeaderLayout> {
    let total = columns.len();
    for row in 0..depth {
        let keys = row_keys(sheet, row);
        let resolved: Vec<ResolvedColumn> = columns
            .columns()
            .iter()
            .filter_map(|column| {
                resolve_in_row(column, &keys).map(|index| ResolvedColumn {
                    name: column.name.clone(),
                    index,
                })
            })
            .collect();
        let found = fraction(resolved.len(), total);
        trace!(row, resolved = resolved.len(), total, "single-row header candidate");
        if !resolved.is_empty() && found >= threshold {
            return Some(HeaderLayout {
                header_row: row,
                kind: HeaderKind::Single,
                columns: resolved,
                fraction: found,
            });
        }
    }
    None
}

fn two_row_pass(
    sheet: &RawSheet,
    columns: &ColumnSynonymMap,
    threshold: f64,
    depth: usize,
) -> Option<HeaderLayout> {
    let total = columns.len();
    for row in 0..depth.saturating_sub(1) {
        let labels = row_keys(sheet, row);
        let fields = row_keys(sheet, row + 1);
        let resolved: Vec<ResolvedColumn> = columns
            .columns()
            .iter()
            .filter_map(|column| {
                resolve_in_pair(column, &labels, &fields).map(|index| ResolvedColumn {
                    name: column.name.clone(),
                    index,
                })
            })
            .collect();
        let found = fraction(resolved.len(), total);
        trace!(row, resolved = resolved.len(), total, "two-row header candidate");
        if !resolved.is_empty() && found >= threshold {
            return Some(HeaderLayout {
                header_row: row + 1,
                kind: HeaderKind::TwoRow { label_row: row },
                columns: resolved,
                fraction: found,
            });
        }
    }
    None
}
