//! Persistence for clarity ingest.
//!
//! - [`PersistenceSink`] is the seam the pipeline writes through.
//! - [`provision_subjects`] creates missing subjects before fact rows land.
//! - [`SqliteSink`] is the bundled SQLite implementation, with
//!   [`bootstrap_statements`] for standing up an empty database.

#![deny(unsafe_code)]

mod error;
mod provision;
mod schema;
mod sink;
mod sqlite;

pub use error::{Result, SinkError};
pub use provision::{
    ProvisioningFailure, ProvisioningReport, distinct_subjects, provision_subjects,
};
pub use schema::{ROW_ID_COLUMN, SUBJECTS_TABLE, bootstrap_statements, quote_ident};
pub use sink::PersistenceSink;
pub use sqlite::SqliteSink;
