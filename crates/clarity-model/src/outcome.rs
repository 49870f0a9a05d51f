//! Per-sheet outcomes and per-file reports.

use serde::{Deserialize, Serialize};

use crate::ids::DatasetId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Success,
    Warning,
    Skipped,
    Error,
}

/// Structured failure category carried next to the human-readable message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// No registry entry matched the sheet.
    ClassificationMiss,
    /// Classified, but no header row qualified or no data followed it.
    ParseFailure,
    /// The destination table lacks a column the data carries.
    SchemaMismatch,
    /// A fact row references a subject that does not exist.
    ReferentialIntegrity,
    /// Creating one subject failed; the batch continued.
    ProvisioningFailure,
    UnknownPersistence,
    /// The upload could not be read at all.
    LoadFailure,
}

impl ErrorKind {
    /// Label matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ClassificationMiss => "classification_miss",
            Self::ParseFailure => "parse_failure",
            Self::SchemaMismatch => "schema_mismatch",
            Self::ReferentialIntegrity => "referential_integrity",
            Self::ProvisioningFailure => "provisioning_failure",
            Self::UnknownPersistence => "unknown_persistence",
            Self::LoadFailure => "load_failure",
        }
    }
}

/// Result of ingesting one sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetOutcome {
    pub sheet: String,
    pub dataset: DatasetId,
    pub table: String,
    pub status: OutcomeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
    pub message: String,
    pub rows: usize,
    /// Later registry entries whose fingerprint also matched this sheet.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ambiguous_with: Vec<DatasetId>,
    /// Subjects that could not be provisioned for this sheet.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub provisioning_failures: Vec<String>,
}

impl SheetOutcome {
    fn new(
        sheet: &str,
        dataset: &DatasetId,
        table: &str,
        status: OutcomeStatus,
        kind: Option<ErrorKind>,
        message: String,
    ) -> Self {
        Self {
            sheet: sheet.to_string(),
            dataset: dataset.clone(),
            table: table.to_string(),
            status,
            kind,
            message,
            rows: 0,
            ambiguous_with: Vec::new(),
            provisioning_failures: Vec::new(),
        }
    }

    pub fn success(sheet: &str, dataset: &DatasetId, table: &str, rows: usize) -> Self {
        let message = format!("Success: Ingested {rows} rows into {table} (Source: {sheet})");
        let mut outcome = Self::new(sheet, dataset, table, OutcomeStatus::Success, None, message);
        outcome.rows = rows;
        outcome
    }

    pub fn parse_failure(sheet: &str, dataset: &DatasetId, table: &str) -> Self {
        let message =
            format!("Warning: Identified '{dataset}' in {sheet} but failed to parse data.");
        Self::new(
            sheet,
            dataset,
            table,
            OutcomeStatus::Warning,
            Some(ErrorKind::ParseFailure),
            message,
        )
    }

    /// Header found, but every data row lacked a subject identifier.
    pub fn no_rows(sheet: &str, dataset: &DatasetId, table: &str) -> Self {
        let message = format!(
            "Skipped: '{dataset}' in {sheet} has no rows with a subject identifier"
        );
        Self::new(sheet, dataset, table, OutcomeStatus::Skipped, None, message)
    }

    pub fn schema_mismatch(
        sheet: &str,
        dataset: &DatasetId,
        table: &str,
        table_columns: &[String],
        data_columns: &[String],
    ) -> Self {
        let message = format!(
            "DB Schema Error ({table}): Missing column.\nDB has: {table_columns:?}\nData has: {data_columns:?}"
        );
        Self::new(
            sheet,
            dataset,
            table,
            OutcomeStatus::Error,
            Some(ErrorKind::SchemaMismatch),
            message,
        )
    }

    pub fn referential_integrity(sheet: &str, dataset: &DatasetId, table: &str) -> Self {
        let message = format!(
            "Foreign Key Error ({table}): Subjects mismatch. Subjects were auto-created, \
             but identifiers in the file may contain hidden characters."
        );
        Self::new(
            sheet,
            dataset,
            table,
            OutcomeStatus::Error,
            Some(ErrorKind::ReferentialIntegrity),
            message,
        )
    }

    pub fn persistence_error(sheet: &str, dataset: &DatasetId, table: &str, error: &str) -> Self {
        let message = format!("DB Error for {table}: {error}");
        Self::new(
            sheet,
            dataset,
            table,
            OutcomeStatus::Error,
            Some(ErrorKind::UnknownPersistence),
            message,
        )
    }

    pub fn with_ambiguity(mut self, others: Vec<DatasetId>) -> Self {
        self.ambiguous_with = others;
        self
    }

    /// Records subjects that could not be provisioned.
    ///
    /// A sheet without another error kind is tagged `ProvisioningFailure`
    /// and its message gains the count. Identifiers stay in
    /// `provisioning_failures` only.
    pub fn with_provisioning_failures(mut self, subjects: Vec<String>) -> Self {
        if !subjects.is_empty() {
            let noun = if subjects.len() == 1 { "subject" } else { "subjects" };
            self.message.push_str(&format!(
                " ({} {noun} could not be provisioned)",
                subjects.len()
            ));
            if self.kind.is_none() {
                self.kind = Some(ErrorKind::ProvisioningFailure);
            }
        }
        self.provisioning_failures = subjects;
        self
    }

    pub fn is_error(&self) -> bool {
        self.status == OutcomeStatus::Error
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Processed,
    Skipped,
    Error,
}

/// Outcome of ingesting one uploaded file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileReport {
    pub status: FileStatus,
    pub file: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
    /// Hex SHA-256 of the uploaded bytes, when they could be read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sheets: Vec<SheetOutcome>,
}

/// Reason reported when no sheet of a file was recognized.
pub const NO_VALID_DATASET_REASON: &str = "No valid datasets found in file.";

impl FileReport {
    /// Builds the report from the ordered sheet outcomes.
    pub fn from_sheets(file: impl Into<String>, sheets: Vec<SheetOutcome>) -> Self {
        let file = file.into();
        if sheets.is_empty() {
            return Self {
                status: FileStatus::Skipped,
                file,
                details: Vec::new(),
                reason: Some(NO_VALID_DATASET_REASON.to_string()),
                kind: Some(ErrorKind::ClassificationMiss),
                sha256: None,
                sheets,
            };
        }
        Self {
            status: FileStatus::Processed,
            file,
            details: sheets.iter().map(|s| s.message.clone()).collect(),
            reason: None,
            kind: None,
            sha256: None,
            sheets,
        }
    }

    pub fn load_error(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            status: FileStatus::Error,
            file: file.into(),
            details: Vec::new(),
            reason: Some(reason.into()),
            kind: Some(ErrorKind::LoadFailure),
            sha256: None,
            sheets: Vec::new(),
        }
    }

    pub fn with_sha256(mut self, digest: Option<String>) -> Self {
        self.sha256 = digest;
        self
    }

    /// Total rows persisted across all sheets.
    pub fn rows_ingested(&self) -> usize {
        self.sheets
            .iter()
            .filter(|s| s.status == OutcomeStatus::Success)
            .map(|s| s.rows)
            .sum()
    }

    pub fn has_errors(&self) -> bool {
        self.status == FileStatus::Error || self.sheets.iter().any(SheetOutcome::is_error)
    }
}
