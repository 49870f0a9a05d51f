//! End-to-end ingestion through the orchestrator into in-memory SQLite.

use std::io::Write;
use std::path::{Path, PathBuf};

use clarity_cli::pipeline::{ingest_file, ingest_sheets};
use clarity_map::IngestOptions;
use clarity_model::{
    CellValue, ErrorKind, FileStatus, NO_VALID_DATASET_REASON, OutcomeStatus, RawSheet,
};
use clarity_persistence::SqliteSink;
use clarity_registry::DatasetRegistry;

fn registry() -> DatasetRegistry {
    DatasetRegistry::load_default().expect("embedded registry")
}

fn bootstrapped(registry: &DatasetRegistry) -> SqliteSink {
    let mut sink = SqliteSink::open_in_memory().unwrap();
    sink.apply_bootstrap_schema(registry.datasets()).unwrap();
    sink
}

fn count(sink: &SqliteSink, sql: &str) -> i64 {
    sink.connection().query_row(sql, [], |row| row.get(0)).unwrap()
}

fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content).unwrap();
    path
}

fn lab_fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../clarity-ingest/tests/fixtures/lab_issues.xlsx")
}

fn lab_sheet(rows: usize) -> RawSheet {
    let mut grid = vec![
        vec!["Missing lab names".to_string()],
        vec!["Lab category".to_string(), "Issue".to_string()],
    ];
    for i in 0..rows {
        grid.push(vec![format!("Chemistry {i}"), format!("Lab name missing {i}")]);
    }
    RawSheet::from_text_rows("Missing_Lab_Name", grid)
}

fn sae_sheet(subject: CellValue) -> RawSheet {
    RawSheet::new(
        "SAE Dashboard_DM",
        vec![
            vec![
                "Study Name".into(),
                "Site".into(),
                "Patient ID".into(),
                "Discrepancy ID".into(),
                "Form Name".into(),
                "Action Status".into(),
            ],
            vec![
                "STUDY-1".into(),
                "S-07".into(),
                subject,
                "DQ-1".into(),
                "Adverse Events".into(),
                "Open".into(),
            ],
        ],
    )
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn unrecognized_csv_is_skipped() {
    let registry = registry();
    let mut sink = bootstrapped(&registry);
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "budget.csv", b"Name,Amount\nTravel,120\n");

    let report = ingest_file(&path, &registry, &IngestOptions::default(), &mut sink);

    assert_eq!(report.status, FileStatus::Skipped);
    assert_eq!(report.file, "budget.csv");
    assert_eq!(report.reason.as_deref(), Some(NO_VALID_DATASET_REASON));
    assert_eq!(report.kind, Some(ErrorKind::ClassificationMiss));
    assert!(report.sha256.is_some());
    assert!(!report.has_errors());
}

#[test]
fn lab_sheet_rows_are_persisted() {
    let registry = registry();
    let mut sink = bootstrapped(&registry);

    let report = ingest_sheets(
        "labs.xlsx",
        &[lab_sheet(10)],
        &registry,
        &IngestOptions::default(),
        &mut sink,
    );

    assert_eq!(report.status, FileStatus::Processed);
    assert_eq!(report.sheets.len(), 1);
    let outcome = &report.sheets[0];
    assert_eq!(outcome.status, OutcomeStatus::Success);
    assert_eq!(outcome.dataset.as_str(), "raw_lab_issues");
    assert_eq!(outcome.rows, 10);
    assert_eq!(
        report.details,
        vec!["Success: Ingested 10 rows into raw_lab_issues (Source: Missing_Lab_Name)"]
    );
    assert_eq!(count(&sink, "SELECT COUNT(*) FROM raw_lab_issues"), 10);
}

#[test]
fn classified_sheet_without_header_is_a_parse_warning() {
    let registry = registry();
    let mut sink = bootstrapped(&registry);
    let sheet = RawSheet::from_text_rows(
        "Missing_Lab_Name",
        vec![
            vec!["Summary of Lab category and Issue counts"],
            vec!["Chemistry", "4"],
            vec!["Haematology", "2"],
        ],
    );

    let report = ingest_sheets(
        "labs.xlsx",
        &[sheet],
        &registry,
        &IngestOptions::default(),
        &mut sink,
    );

    assert_eq!(report.status, FileStatus::Processed);
    let outcome = &report.sheets[0];
    assert_eq!(outcome.status, OutcomeStatus::Warning);
    assert_eq!(outcome.kind, Some(ErrorKind::ParseFailure));
    assert_eq!(
        outcome.message,
        "Warning: Identified 'raw_lab_issues' in Missing_Lab_Name but failed to parse data."
    );
    assert!(!report.has_errors());
}

#[test]
fn unseen_subject_is_provisioned_before_insert() {
    let registry = registry();
    let mut sink = bootstrapped(&registry);

    let report = ingest_sheets(
        "sae.xlsx",
        &[sae_sheet(CellValue::Float(2048.0))],
        &registry,
        &IngestOptions::default(),
        &mut sink,
    );

    insta::assert_json_snapshot!(report, @r#"
    {
      "status": "processed",
      "file": "sae.xlsx",
      "details": [
        "Success: Ingested 1 rows into raw_sae_dm (Source: SAE Dashboard_DM)"
      ],
      "sheets": [
        {
          "sheet": "SAE Dashboard_DM",
          "dataset": "raw_sae_dm",
          "table": "raw_sae_dm",
          "status": "success",
          "message": "Success: Ingested 1 rows into raw_sae_dm (Source: SAE Dashboard_DM)",
          "rows": 1
        }
      ]
    }
    "#);

    let (site, study): (String, String) = sink
        .connection()
        .query_row(
            "SELECT site_id, study_name FROM subjects WHERE subject_id = '2048'",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(site, "S-07");
    assert_eq!(study, "STUDY-1");
    assert_eq!(
        count(&sink, "SELECT COUNT(*) FROM raw_sae_dm WHERE subject_id = '2048'"),
        1
    );
}

#[test]
fn reingesting_the_same_sheet_reuses_subjects() {
    let registry = registry();
    let mut sink = bootstrapped(&registry);
    let options = IngestOptions::default();
    let sheets = [sae_sheet(CellValue::from("2048 "))];

    let first = ingest_sheets("sae.xlsx", &sheets, &registry, &options, &mut sink);
    let second = ingest_sheets("sae.xlsx", &sheets, &registry, &options, &mut sink);

    assert_eq!(first.rows_ingested(), 1);
    assert_eq!(second.rows_ingested(), 1);
    assert_eq!(count(&sink, "SELECT COUNT(*) FROM subjects"), 1);
    assert_eq!(count(&sink, "SELECT COUNT(*) FROM raw_sae_dm"), 2);
}

// ============================================================================
// Failure isolation
// ============================================================================

#[test]
fn rows_without_subject_are_skipped_not_failed() {
    let registry = registry();
    let mut sink = bootstrapped(&registry);

    let report = ingest_sheets(
        "sae.xlsx",
        &[sae_sheet(CellValue::from("N/A"))],
        &registry,
        &IngestOptions::default(),
        &mut sink,
    );

    let outcome = &report.sheets[0];
    assert_eq!(outcome.status, OutcomeStatus::Skipped);
    assert!(!report.has_errors());
    assert_eq!(count(&sink, "SELECT COUNT(*) FROM subjects"), 0);
}

#[test]
fn narrow_destination_table_is_a_schema_mismatch() {
    let registry = registry();
    let mut sink = SqliteSink::open_in_memory().unwrap();
    sink.connection()
        .execute_batch("CREATE TABLE raw_lab_issues (row_id INTEGER PRIMARY KEY, issue TEXT);")
        .unwrap();

    let report = ingest_sheets(
        "labs.xlsx",
        &[lab_sheet(3)],
        &registry,
        &IngestOptions::default(),
        &mut sink,
    );

    let outcome = &report.sheets[0];
    assert_eq!(outcome.status, OutcomeStatus::Error);
    assert_eq!(outcome.kind, Some(ErrorKind::SchemaMismatch));
    assert_eq!(
        outcome.message,
        "DB Schema Error (raw_lab_issues): Missing column.\n\
         DB has: [\"row_id\", \"issue\"]\n\
         Data has: [\"lab_category\", \"issue\"]"
    );
    assert!(report.has_errors());
}

#[test]
fn rejected_subjects_surface_as_referential_integrity() {
    let registry = registry();
    let mut sink = SqliteSink::open_in_memory().unwrap();
    sink.connection()
        .execute_batch(
            "CREATE TABLE subjects (
                subject_id TEXT PRIMARY KEY CHECK (length(subject_id) > 8),
                site_id TEXT,
                study_name TEXT
            );
            CREATE TABLE raw_sae_dm (
                row_id INTEGER PRIMARY KEY,
                study_name, site_id,
                subject_id TEXT REFERENCES subjects(subject_id),
                discrepancy_id, form_name, action_status
            );",
        )
        .unwrap();

    let report = ingest_sheets(
        "sae.xlsx",
        &[sae_sheet(CellValue::from("2048"))],
        &registry,
        &IngestOptions::default(),
        &mut sink,
    );

    let outcome = &report.sheets[0];
    assert_eq!(outcome.kind, Some(ErrorKind::ReferentialIntegrity));
    assert_eq!(outcome.provisioning_failures, vec!["2048"]);
    assert_eq!(count(&sink, "SELECT COUNT(*) FROM raw_sae_dm"), 0);
}

#[test]
fn rejected_subjects_are_reported_when_rows_still_land() {
    let registry = registry();
    let mut sink = SqliteSink::open_in_memory().unwrap();
    sink.connection()
        .execute_batch(
            "CREATE TABLE subjects (
                subject_id TEXT PRIMARY KEY CHECK (length(subject_id) > 8),
                site_id TEXT,
                study_name TEXT
            );
            CREATE TABLE raw_sae_dm (
                row_id INTEGER PRIMARY KEY,
                study_name, site_id, subject_id,
                discrepancy_id, form_name, action_status
            );",
        )
        .unwrap();

    let report = ingest_sheets(
        "sae.xlsx",
        &[sae_sheet(CellValue::from("2048"))],
        &registry,
        &IngestOptions::default(),
        &mut sink,
    );

    let outcome = &report.sheets[0];
    assert_eq!(outcome.status, OutcomeStatus::Success);
    assert_eq!(outcome.kind, Some(ErrorKind::ProvisioningFailure));
    assert_eq!(outcome.provisioning_failures, vec!["2048"]);
    assert_eq!(
        report.details,
        vec![
            "Success: Ingested 1 rows into raw_sae_dm (Source: SAE Dashboard_DM) \
             (1 subject could not be provisioned)"
        ]
    );
    assert_eq!(count(&sink, "SELECT COUNT(*) FROM raw_sae_dm"), 1);
    assert_eq!(count(&sink, "SELECT COUNT(*) FROM subjects"), 0);
}

#[test]
fn one_bad_sheet_does_not_stop_the_next() {
    let registry = registry();
    let mut sink = bootstrapped(&registry);
    let unparseable = RawSheet::from_text_rows(
        "Missing_Lab_Name (old)",
        vec![vec!["Lab category / Issue export"]],
    );
    let notes = RawSheet::from_text_rows("Notes", vec![vec!["nothing to see"]]);

    let report = ingest_sheets(
        "labs.xlsx",
        &[unparseable, notes, sae_sheet(CellValue::from("1023"))],
        &registry,
        &IngestOptions::default(),
        &mut sink,
    );

    let statuses: Vec<OutcomeStatus> = report.sheets.iter().map(|s| s.status).collect();
    assert_eq!(statuses, vec![OutcomeStatus::Warning, OutcomeStatus::Success]);
    assert_eq!(report.rows_ingested(), 1);
}

#[test]
fn files_are_independent() {
    let registry = registry();
    let mut sink = bootstrapped(&registry);
    let options = IngestOptions::default();
    let dir = tempfile::tempdir().unwrap();
    let broken = write_file(dir.path(), "broken.xlsx", b"not a workbook");

    let reports: Vec<_> = [broken, lab_fixture()]
        .iter()
        .map(|path| ingest_file(path, &registry, &options, &mut sink))
        .collect();

    assert_eq!(reports[0].status, FileStatus::Error);
    assert_eq!(reports[0].kind, Some(ErrorKind::LoadFailure));
    assert!(reports[0].sha256.is_none());
    assert_eq!(reports[1].status, FileStatus::Processed);
}

#[test]
fn workbook_fixture_drops_rows_without_subject() {
    let registry = registry();
    let mut sink = bootstrapped(&registry);

    let report = ingest_file(&lab_fixture(), &registry, &IngestOptions::default(), &mut sink);

    assert_eq!(report.file, "lab_issues.xlsx");
    assert_eq!(report.sheets.len(), 1);
    assert_eq!(report.sheets[0].sheet, "Missing_Lab_Name");
    assert_eq!(report.sheets[0].rows, 2);
    assert_eq!(report.sha256.as_ref().map(String::len), Some(64));

    let mut stmt = sink
        .connection()
        .prepare("SELECT subject_id FROM subjects ORDER BY subject_id")
        .unwrap();
    let subjects: Vec<String> = stmt
        .query_map([], |row| row.get(0))
        .unwrap()
        .map(Result::unwrap)
        .collect();
    assert_eq!(subjects, vec!["1023", "1024"]);
}
