//! Ingestion orchestrator.
//!
//! One uploaded file is processed sheet by sheet:
//! 1. **Load**: read the upload into raw sheets
//! 2. **Classify**: match each sheet against the registry (misses are skipped)
//! 3. **Locate header**: find the header row and resolve canonical columns
//! 4. **Extract**: normalize rows below the header
//! 5. **Provision**: create any subjects the rows reference
//! 6. **Persist**: append the rows to the destination table
//!
//! A failure in one sheet is reported and the next sheet still runs.

use std::path::Path;

use clarity_ingest::load_upload;
use clarity_map::{IngestOptions, classify, locate_header};
use clarity_model::{FileReport, NormalizedTable, RawSheet, SheetOutcome};
use clarity_persistence::{PersistenceSink, SinkError, provision_subjects};
use clarity_registry::DatasetRegistry;
use clarity_transform::extract_rows;
use tracing::{error, info, info_span, warn};

use crate::logging::redact_value;

/// Name reported for an upload: its file name, or the whole path as a fallback.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Loads and ingests one file.
///
/// Load failures become an error report for this file only.
pub fn ingest_file<S>(
    path: &Path,
    registry: &DatasetRegistry,
    options: &IngestOptions,
    sink: &mut S,
) -> FileReport
where
    S: PersistenceSink + ?Sized,
{
    let file_name = display_name(path);
    let span = info_span!("file", file = %file_name);
    let _guard = span.enter();

    let upload = match load_upload(path) {
        Ok(upload) => upload,
        Err(err) => {
            error!(error = %err, "failed to load file");
            return FileReport::load_error(file_name, err.to_string());
        }
    };
    info!(
        format = %upload.format,
        sheets = upload.sheets.len(),
        "loaded file"
    );
    ingest_sheets(&file_name, &upload.sheets, registry, options, sink)
        .with_sha256(Some(upload.sha256))
}

/// Ingests already-loaded sheets in order.
pub fn ingest_sheets<S>(
    file_name: &str,
    sheets: &[RawSheet],
    registry: &DatasetRegistry,
    options: &IngestOptions,
    sink: &mut S,
) -> FileReport
where
    S: PersistenceSink + ?Sized,
{
    let outcomes: Vec<SheetOutcome> = sheets
        .iter()
        .filter_map(|sheet| ingest_sheet(sheet, registry, options, sink))
        .collect();
    let report = FileReport::from_sheets(file_name, outcomes);
    info!(
        file = file_name,
        status = ?report.status,
        rows = report.rows_ingested(),
        "finished file"
    );
    report
}

/// Runs one sheet through the pipeline.
///
/// Returns `None` when no dataset type matched the sheet.
pub fn ingest_sheet<S>(
    sheet: &RawSheet,
    registry: &DatasetRegistry,
    options: &IngestOptions,
    sink: &mut S,
) -> Option<SheetOutcome>
where
    S: PersistenceSink + ?Sized,
{
    let span = info_span!("sheet", sheet = %sheet.name);
    let _guard = span.enter();

    let classified = classify(sheet, registry, options.sample_rows)?;
    let spec = classified.spec;
    let ambiguous_with = classified.ambiguous_with;
    info!(dataset = %spec.id, table = %spec.table, "classified sheet");

    let Some(layout) = locate_header(
        sheet,
        &spec.columns,
        &options.thresholds,
        options.header_scan_rows,
    ) else {
        warn!(dataset = %spec.id, "no header row found");
        return Some(
            SheetOutcome::parse_failure(&sheet.name, &spec.id, &spec.table)
                .with_ambiguity(ambiguous_with),
        );
    };

    let extraction = extract_rows(sheet, &layout, spec);
    if extraction.has_no_data() {
        warn!(dataset = %spec.id, header_row = layout.header_row, "no data below header");
        return Some(
            SheetOutcome::parse_failure(&sheet.name, &spec.id, &spec.table)
                .with_ambiguity(ambiguous_with),
        );
    }
    let table = extraction.table;
    if table.is_empty() {
        info!(
            dataset = %spec.id,
            dropped_missing_subject = extraction.dropped_missing_subject,
            "no rows left after filtering"
        );
        return Some(
            SheetOutcome::no_rows(&sheet.name, &spec.id, &spec.table)
                .with_ambiguity(ambiguous_with),
        );
    }

    let provisioning = provision_subjects(sink, &table);
    for failure in &provisioning.failures {
        warn!(
            subject_id = redact_value(&failure.subject_id),
            error = %failure.message,
            "failed to provision subject"
        );
    }

    let outcome = persist(&sheet.name, &table, sink)
        .with_ambiguity(ambiguous_with)
        .with_provisioning_failures(provisioning.failed_subjects());
    Some(outcome)
}

fn persist<S>(sheet: &str, table: &NormalizedTable, sink: &mut S) -> SheetOutcome
where
    S: PersistenceSink + ?Sized,
{
    match sink.append_rows(table) {
        Ok(rows) => {
            info!(table = %table.table, rows, "ingested rows");
            SheetOutcome::success(sheet, &table.dataset, &table.table, rows)
        }
        Err(SinkError::SchemaMismatch { message, .. }) => {
            warn!(table = %table.table, error = %message, "schema mismatch");
            let table_columns = sink.table_columns(&table.table).unwrap_or_default();
            SheetOutcome::schema_mismatch(
                sheet,
                &table.dataset,
                &table.table,
                &table_columns,
                &table.columns,
            )
        }
        Err(SinkError::ReferentialIntegrity { message, .. }) => {
            warn!(table = %table.table, error = %message, "foreign key violation");
            SheetOutcome::referential_integrity(sheet, &table.dataset, &table.table)
        }
        Err(err) => {
            warn!(table = %table.table, error = %err, "persistence failed");
            SheetOutcome::persistence_error(sheet, &table.dataset, &table.table, &err.to_string())
        }
    }
}
