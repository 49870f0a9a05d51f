//! The persistence seam between the ingest pipeline and a backing store.

use clarity_model::{NormalizedTable, Subject};

use crate::error::Result;

/// Destination for normalized rows and the subjects they reference.
///
/// One sink instance is used for every sheet of a file, sequentially.
pub trait PersistenceSink {
    /// Appends every row of `table` to `table.table`, all or nothing.
    ///
    /// Returns the number of rows written.
    fn append_rows(&mut self, table: &NormalizedTable) -> Result<usize>;

    /// Inserts a subject unless one with the same identifier exists.
    ///
    /// Returns `true` when a new subject was created. The insert is durable
    /// once this returns.
    fn insert_subject_if_absent(&mut self, subject: &Subject) -> Result<bool>;

    /// Column names of a destination table, for schema diagnostics.
    fn table_columns(&mut self, table: &str) -> Result<Vec<String>>;
}

impl<S: PersistenceSink + ?Sized> PersistenceSink for &mut S {
    fn append_rows(&mut self, table: &NormalizedTable) -> Result<usize> {
        (**self).append_rows(table)
    }

    fn insert_subject_if_absent(&mut self, subject: &Subject) -> Result<bool> {
        (**self).insert_subject_if_absent(subject)
    }

    fn table_columns(&mut self, table: &str) -> Result<Vec<String>> {
        (**self).table_columns(table)
    }
}
