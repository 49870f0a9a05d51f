//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use clarity_map::{DEFAULT_SINGLE_ROW_THRESHOLD, DEFAULT_TWO_ROW_THRESHOLD, HEADER_SCAN_ROWS};

#[derive(Parser)]
#[command(
    name = "clarity",
    version,
    about = "Ingest clinical-trial spreadsheets into a relational store",
    long_about = "Ingest clinical-trial operational reports (CSV and Excel workbooks).\n\n\
                  Each sheet is recognized by its name and keywords, its header row is\n\
                  located, and its rows are normalized and appended to the matching table."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Include subject identifiers in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Ingest one or more uploaded files.
    Ingest(IngestArgs),

    /// List the recognized dataset types.
    Datasets(RegistryArgs),

    /// Create the subject table and one fact table per dataset type.
    InitDb(InitDbArgs),
}

#[derive(Args)]
pub struct RegistryArgs {
    /// Directory holding registry.toml and columns/ (overrides the embedded registry).
    #[arg(long = "config-dir", value_name = "DIR", env = "CLARITY_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,
}

#[derive(Parser)]
pub struct IngestArgs {
    /// CSV or workbook files to ingest.
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<PathBuf>,

    /// SQLite database to write to.
    #[arg(long = "database", value_name = "PATH", default_value = "clarity.db")]
    pub database: PathBuf,

    /// Create missing tables before ingesting.
    #[arg(long = "init-db")]
    pub init_db: bool,

    /// Print the summary as JSON.
    #[arg(long = "json")]
    pub json: bool,

    /// Minimum fraction of columns a single header row must resolve.
    #[arg(long = "single-row-threshold", value_name = "FRACTION", default_value_t = DEFAULT_SINGLE_ROW_THRESHOLD)]
    pub single_row_threshold: f64,

    /// Minimum fraction of columns a two-row header must resolve.
    #[arg(long = "two-row-threshold", value_name = "FRACTION", default_value_t = DEFAULT_TWO_ROW_THRESHOLD)]
    pub two_row_threshold: f64,

    /// Number of leading rows searched for a header.
    #[arg(long = "header-scan-rows", value_name = "ROWS", default_value_t = HEADER_SCAN_ROWS)]
    pub header_scan_rows: usize,

    #[command(flatten)]
    pub registry: RegistryArgs,
}

#[derive(Parser)]
pub struct InitDbArgs {
    /// SQLite database to create or extend.
    #[arg(long = "database", value_name = "PATH", default_value = "clarity.db")]
    pub database: PathBuf,

    #[command(flatten)]
    pub registry: RegistryArgs,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn ingest_defaults() {
        let cli = Cli::try_parse_from(["clarity", "ingest", "labs.xlsx", "deviations.csv"]).unwrap();
        let Command::Ingest(args) = cli.command else {
            panic!("expected ingest");
        };
        assert_eq!(args.files.len(), 2);
        assert_eq!(args.database, PathBuf::from("clarity.db"));
        assert_eq!(args.single_row_threshold, DEFAULT_SINGLE_ROW_THRESHOLD);
        assert_eq!(args.two_row_threshold, DEFAULT_TWO_ROW_THRESHOLD);
        assert!(!args.json);
    }

    #[test]
    fn ingest_requires_files() {
        assert!(Cli::try_parse_from(["clarity", "ingest"]).is_err());
    }
}
