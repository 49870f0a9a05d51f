//! Subject auto-provisioning ahead of fact inserts.

use std::collections::BTreeSet;

use clarity_model::{NormalizedTable, SUBJECT_ID, Subject};
use serde::Serialize;
use tracing::debug;

use crate::sink::PersistenceSink;

/// One subject that could not be created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisioningFailure {
    pub subject_id: String,
    pub message: String,
}

/// What provisioning did for one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProvisioningReport {
    pub created: usize,
    pub existing: usize,
    pub failures: Vec<ProvisioningFailure>,
}

impl ProvisioningReport {
    pub fn requested(&self) -> usize {
        self.created + self.existing + self.failures.len()
    }

    pub fn failed_subjects(&self) -> Vec<String> {
        self.failures.iter().map(|f| f.subject_id.clone()).collect()
    }
}

/// Distinct subjects of a batch in first-occurrence order.
///
/// The first row naming a subject supplies its site and study.
pub fn distinct_subjects(table: &NormalizedTable) -> Vec<Subject> {
    if !table.has_column(SUBJECT_ID) {
        return Vec::new();
    }
    let mut seen = BTreeSet::new();
    table
        .rows
        .iter()
        .filter_map(Subject::from_row)
        .filter(|subject| seen.insert(subject.subject_id.clone()))
        .collect()
}

/// Ensures every subject referenced by `table` exists in the sink.
///
/// Each failure is recorded and the loop moves on to the next subject.
pub fn provision_subjects<S>(sink: &mut S, table: &NormalizedTable) -> ProvisioningReport
where
    S: PersistenceSink + ?Sized,
{
    let mut report = ProvisioningReport::default();
    for subject in distinct_subjects(table) {
        match sink.insert_subject_if_absent(&subject) {
            Ok(true) => report.created += 1,
            Ok(false) => report.existing += 1,
            Err(err) => report.failures.push(ProvisioningFailure {
                subject_id: subject.subject_id,
                message: err.to_string(),
            }),
        }
    }
    debug!(
        table = %table.table,
        created = report.created,
        existing = report.existing,
        failed = report.failures.len(),
        "provisioned subjects"
    );
    report
}
