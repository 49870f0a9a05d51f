//! Dataset classification by sheet-name hint and keyword fingerprint.

use clarity_model::{DEFAULT_SHEET_NAME, DatasetId, DatasetTypeSpec, RawSheet};
use clarity_registry::DatasetRegistry;
use tracing::{debug, warn};

/// A sheet paired with the dataset type it was recognized as.
#[derive(Debug, Clone)]
pub struct ClassifiedSheet<'a> {
    pub sheet: &'a RawSheet,
    pub spec: &'a DatasetTypeSpec,
    /// Later registry entries whose fingerprint also matched.
    pub ambiguous_with: Vec<DatasetId>,
}

impl ClassifiedSheet<'_> {
    pub fn is_ambiguous(&self) -> bool {
        !self.ambiguous_with.is_empty()
    }
}

/// Lower-cased text of the first `rows` rows.
///
/// Cells are joined by a tab and rows by a newline so a keyword never
/// matches across a cell boundary.
pub fn sample_text(sheet: &RawSheet, rows: usize) -> String {
    let mut out = String::new();
    for (i, row) in sheet.rows.iter().take(rows).enumerate() {
        if i > 0 {
            out.push('\n');
        }
        for (j, cell) in row.iter().enumerate() {
            if j > 0 {
                out.push('\t');
            }
            if !cell.is_blank() {
                out.push_str(&cell.to_text());
            }
        }
    }
    out.to_lowercase()
}

/// Fingerprint test: sheet-name hint plus every required keyword.
///
/// `sample` must already be lower-cased. The hint check is skipped for the
/// default single-sheet name used by CSV uploads.
pub fn matches_fingerprint(sheet_name: &str, sample: &str, spec: &DatasetTypeSpec) -> bool {
    if sheet_name != DEFAULT_SHEET_NAME
        && let Some(hint) = spec.sheet_hint_key()
        && !sheet_name.to_lowercase().contains(&hint)
    {
        return false;
    }
    spec.keyword_keys()
        .iter()
        .all(|keyword| sample.contains(keyword.as_str()))
}

/// Returns the first dataset type, in registry order, whose fingerprint
/// matches the sheet.
pub fn classify<'a>(
    sheet: &'a RawSheet,
    registry: &'a DatasetRegistry,
    sample_rows: usize,
) -> Option<ClassifiedSheet<'a>> {
    let sample = sample_text(sheet, sample_rows);
    let mut matches = registry
        .iter()
        .filter(|spec| matches_fingerprint(&sheet.name, &sample, spec));

    let Some(spec) = matches.next() else {
        debug!(sheet = %sheet.name, "no dataset type matched");
        return None;
    };
    let ambiguous_with: Vec<DatasetId> = matches.map(|other| other.id.clone()).collect();
    if !ambiguous_with.is_empty() {
        warn!(
            sheet = %sheet.name,
            dataset = %spec.id,
            also_matched = ?ambiguous_with.iter().map(DatasetId::as_str).collect::<Vec<_>>(),
            "sheet matches more than one dataset type; using the first"
        );
    }
    debug!(sheet = %sheet.name, dataset = %spec.id, "classified sheet");
    Some(ClassifiedSheet {
        sheet,
        spec,
        ambiguous_with,
    })
}

#[cfg(test)]
mod tests {
    use clarity_model::{CanonicalColumn, CellValue, ColumnSynonymMap};

    use super::*;

    fn spec(id: &str, hint: &str, keywords: &[&str]) -> DatasetTypeSpec {
        DatasetTypeSpec {
            id: DatasetId::new(id).unwrap(),
            sheet_hint: hint.to_string(),
            required_keywords: keywords.iter().map(ToString::to_string).collect(),
            table: id.to_string(),
            columns: ColumnSynonymMap::new(vec![
                CanonicalColumn::new("subject_id", vec!["Subject".to_string()]).unwrap(),
            ])
            .unwrap(),
        }
    }

    #[test]
    fn sample_text_is_lowercase_and_cell_separated() {
        let sheet = RawSheet::new(
            "S",
            vec![
                vec![CellValue::from("Subject"), CellValue::Empty, CellValue::Float(1.0)],
                vec![CellValue::from("PD Status")],
            ],
        );
        assert_eq!(sample_text(&sheet, 20), "subject\t\t1.0\npd status");
        assert_eq!(sample_text(&sheet, 1), "subject\t\t1.0");
    }

    #[test]
    fn keywords_do_not_span_cells() {
        let sheet = RawSheet::from_text_rows("Protocol Deviation", vec![vec!["PD", "Status"]]);
        let sample = sample_text(&sheet, 20);
        let pd = spec("pd", "Protocol Deviation", &["PD Status"]);
        assert!(!matches_fingerprint(&sheet.name, &sample, &pd));
    }

    #[test]
    fn sheet_hint_is_case_insensitive_substring() {
        let pd = spec("pd", "Protocol Deviation", &["PD Status"]);
        assert!(matches_fingerprint("Site PROTOCOL DEVIATION log", "pd status", &pd));
        assert!(!matches_fingerprint("Deviations", "pd status", &pd));
    }

    #[test]
    fn default_sheet_name_bypasses_hint() {
        let pd = spec("pd", "Protocol Deviation", &["PD Status"]);
        assert!(matches_fingerprint("Sheet1", "subject\tpd status", &pd));
        assert!(!matches_fingerprint("Sheet1", "subject", &pd));
    }

    #[test]
    fn empty_hint_matches_any_sheet() {
        let any = spec("any", "", &["form"]);
        assert!(matches_fingerprint("Whatever", "form name", &any));
    }
}
