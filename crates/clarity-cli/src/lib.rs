//! Library surface of the clarity CLI: logging setup and the ingest orchestrator.

pub mod logging;
pub mod pipeline;
