//! Blank-marker detection.
//!
//! Upstream exports use a zoo of placeholders for "no value". All of them,
//! together with empty or whitespace-only text, float NaN and spreadsheet
//! error cells, collapse to [`CellValue::Empty`].

use clarity_model::CellValue;

/// Text placeholders treated as missing values (matched after trimming).
pub const NA_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// True when `text` is empty, whitespace-only or a known NA placeholder.
pub fn is_na_marker(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty() || NA_MARKERS.contains(&trimmed)
}

/// Replaces blank cells and NA placeholders with `Empty`; other values pass
/// through untouched.
pub fn nullify_blank(cell: &CellValue) -> CellValue {
    match cell {
        _ if cell.is_blank() => CellValue::Empty,
        CellValue::Text(text) if is_na_marker(text) => CellValue::Empty,
        other => other.clone(),
    }
}
