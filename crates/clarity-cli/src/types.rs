use std::path::PathBuf;

use clarity_model::FileReport;
use serde::Serialize;

/// Reports of one `ingest` invocation, in argument order.
#[derive(Debug)]
pub struct IngestRun {
    pub database: PathBuf,
    pub reports: Vec<FileReport>,
}

impl IngestRun {
    pub fn has_errors(&self) -> bool {
        self.reports.iter().any(FileReport::has_errors)
    }

    pub fn rows_ingested(&self) -> usize {
        self.reports.iter().map(FileReport::rows_ingested).sum()
    }
}

/// JSON body printed by `ingest --json`.
#[derive(Debug, Serialize)]
pub struct UploadSummary<'a> {
    pub summary: &'a [FileReport],
}
