//! Tests for loading and validating the dataset registry.

use std::fs;
use std::path::Path;

use clarity_registry::{DatasetRegistry, RegistryError, RegistrySource};

// ============================================================================
// Embedded defaults
// ============================================================================

#[test]
fn default_registry_keeps_declaration_order() {
    let registry = DatasetRegistry::load_default().expect("embedded registry loads");
    let ids: Vec<&str> = registry.iter().map(|spec| spec.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "raw_cpid_metrics",
            "raw_protocol_deviations",
            "raw_sdv_metrics",
            "raw_visit_projections",
            "raw_lab_issues",
            "raw_sae_safety",
            "raw_sae_dm",
            "raw_coding_meddra",
            "raw_coding_whodra",
            "raw_missing_pages",
            "raw_inactivated_forms",
            "raw_edrr_issues",
        ]
    );
    assert_eq!(registry.source(), &RegistrySource::Embedded);
}

#[test]
fn every_default_dataset_has_subject_column() {
    let registry = DatasetRegistry::load_default().unwrap();
    for spec in &registry {
        assert!(
            spec.columns.get("subject_id").is_some(),
            "{} lacks subject_id",
            spec.id
        );
        assert!(!spec.required_keywords.is_empty());
        assert!(!spec.table.is_empty());
    }
}

#[test]
fn lab_issues_synonyms_match_expected_headers() {
    let registry = DatasetRegistry::load_default().unwrap();
    let lab = registry.get("raw_lab_issues").expect("lab dataset");
    assert_eq!(lab.sheet_hint, "Missing_Lab_Name");
    assert_eq!(lab.table, "raw_lab_issues");
    let names: Vec<&str> = lab.columns.names().collect();
    assert_eq!(names, vec!["subject_id", "site_id", "lab_category", "issue"]);
    let category = lab.columns.get("lab_category").unwrap();
    assert_eq!(category.match_keys()[0], "lab category");
}

// ============================================================================
// Directory override
// ============================================================================

fn write_config(dir: &Path, registry: &str, columns: &[(&str, &str)]) {
    fs::write(dir.join("registry.toml"), registry).unwrap();
    fs::create_dir_all(dir.join("columns")).unwrap();
    for (name, contents) in columns {
        fs::write(dir.join("columns").join(name), contents).unwrap();
    }
}

const SMALL_REGISTRY: &str = r#"
[registry]
schema = "clarity-registry"
schema_version = 1

[[dataset]]
id = "visits"
sheet_hint = "Visits"
required_keywords = ["Visit Date"]
table = "raw_visits"

[[dataset]]
id = "forms"
required_keywords = ["Form"]
table = "raw_forms"
columns = "shared.toml"
"#;

const SIMPLE_COLUMNS: &str = r#"
[[column]]
name = "subject_id"
headers = ["Subject"]

[[column]]
name = "visit_date"
headers = ["Visit Date", "Date of Visit"]
"#;

#[test]
fn loads_override_directory() {
    let dir = tempfile::tempdir().unwrap();
    write_config(
        dir.path(),
        SMALL_REGISTRY,
        &[("visits.toml", SIMPLE_COLUMNS), ("shared.toml", SIMPLE_COLUMNS)],
    );

    let registry = DatasetRegistry::load(Some(dir.path())).expect("override loads");
    assert_eq!(registry.len(), 2);
    assert_eq!(
        registry.source(),
        &RegistrySource::Directory(dir.path().to_path_buf())
    );
    let forms = registry.get("forms").unwrap();
    assert_eq!(forms.sheet_hint, "");
    assert_eq!(forms.table, "raw_forms");
    assert_eq!(forms.columns.len(), 2);
}

#[test]
fn missing_columns_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), SMALL_REGISTRY, &[("visits.toml", SIMPLE_COLUMNS)]);

    let err = DatasetRegistry::load_from_dir(dir.path()).unwrap_err();
    match err {
        RegistryError::MissingColumns { id, path } => {
            assert_eq!(id, "forms");
            assert!(path.ends_with("columns/shared.toml"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn duplicate_dataset_ids_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let registry = SMALL_REGISTRY.replace("id = \"forms\"", "id = \"visits\"");
    write_config(
        dir.path(),
        &registry,
        &[("visits.toml", SIMPLE_COLUMNS), ("shared.toml", SIMPLE_COLUMNS)],
    );

    let err = DatasetRegistry::load_from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateDataset { ref id } if id == "visits"));
}

#[test]
fn unsupported_schema_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let registry = SMALL_REGISTRY.replace("schema_version = 1", "schema_version = 7");
    write_config(dir.path(), &registry, &[]);

    let err = DatasetRegistry::load_from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, RegistryError::InvalidRegistry { .. }));
    assert!(err.to_string().contains("schema_version"));
}

#[test]
fn empty_keyword_list_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let registry = SMALL_REGISTRY.replace("[\"Form\"]", "[]");
    write_config(
        dir.path(),
        &registry,
        &[("visits.toml", SIMPLE_COLUMNS), ("shared.toml", SIMPLE_COLUMNS)],
    );

    let err = DatasetRegistry::load_from_dir(dir.path()).unwrap_err();
    assert!(err.to_string().contains("required_keywords"));
}

#[test]
fn duplicated_canonical_column_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let columns = format!("{SIMPLE_COLUMNS}\n[[column]]\nname = \"subject_id\"\nheaders = [\"Subj\"]\n");
    write_config(
        dir.path(),
        SMALL_REGISTRY,
        &[("visits.toml", &columns), ("shared.toml", SIMPLE_COLUMNS)],
    );

    let err = DatasetRegistry::load_from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, RegistryError::Columns { .. }));
}

#[test]
fn missing_registry_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = DatasetRegistry::load_from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, RegistryError::Io { .. }));
}
