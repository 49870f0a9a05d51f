//! Subject identifier normalization.

use clarity_model::CellValue;

use super::blank::nullify_blank;

/// Canonical text form of a subject identifier.
///
/// Numeric coercion upstream turns `1023` into `1023.0`; the suffix is
/// removed and surrounding whitespace trimmed. Trimming happens first too,
/// so a padded `" 1023.0 "` still loses its suffix. Returns `None` for blank
/// identifiers.
pub fn normalize_subject_id(cell: &CellValue) -> Option<String> {
    let cell = nullify_blank(cell);
    if cell.is_blank() {
        return None;
    }
    let text = cell.to_text();
    let trimmed = text.trim();
    let stripped = trimmed.strip_suffix(".0").unwrap_or(trimmed).trim_end();
    (!stripped.is_empty()).then(|| stripped.to_string())
}
