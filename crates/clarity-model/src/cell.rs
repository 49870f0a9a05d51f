//! Untyped cell values as they come out of a CSV or workbook sheet.

use serde::{Deserialize, Serialize};

/// A single grid cell.
///
/// `Empty` doubles as the explicit null of a normalized row and is written
/// to the destination table as SQL `NULL`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// ISO-8601 rendering of a spreadsheet date/time cell.
    DateTime(String),
    /// Spreadsheet error cell such as `#N/A` or `#DIV/0!`.
    Error(String),
}

impl CellValue {
    /// Returns true for cells that carry no value: empty cells, float NaN
    /// placeholders and spreadsheet error cells.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty | Self::Error(_) => true,
            Self::Float(v) => v.is_nan(),
            Self::Text(_) | Self::Int(_) | Self::Bool(_) | Self::DateTime(_) => false,
        }
    }

    /// Text rendering used for classification and header matching.
    ///
    /// Whole floats keep their `.0` suffix, the same way upstream numeric
    /// coercion renders them.
    pub fn to_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) | Self::DateTime(s) | Self::Error(s) => s.clone(),
            Self::Int(v) => v.to_string(),
            Self::Float(v) => render_float(*v),
            Self::Bool(b) => if *b { "true" } else { "false" }.to_string(),
        }
    }

    /// Returns the text form, or `None` for blank cells.
    pub fn as_text_non_blank(&self) -> Option<String> {
        if self.is_blank() {
            None
        } else {
            Some(self.to_text())
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Self::Empty
        } else {
            Self::Text(value.to_string())
        }
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        if value.is_empty() {
            Self::Empty
        } else {
            Self::Text(value)
        }
    }
}

fn render_float(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 {
        format!("{v:.1}")
    } else {
        v.to_string()
    }
}
