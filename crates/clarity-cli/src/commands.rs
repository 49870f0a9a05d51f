use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{Cell, CellAlignment, Table};
use tracing::{info, info_span};

use clarity_cli::pipeline::ingest_file;
use clarity_map::{HeaderThresholds, IngestOptions};
use clarity_persistence::SqliteSink;
use clarity_registry::DatasetRegistry;

use crate::cli::{IngestArgs, InitDbArgs, RegistryArgs};
use crate::summary::{align_column, apply_table_style, header_cell};
use crate::types::IngestRun;

fn load_registry(args: &RegistryArgs) -> Result<DatasetRegistry> {
    let registry =
        DatasetRegistry::load(args.config_dir.as_deref()).context("load dataset registry")?;
    info!(
        datasets = registry.len(),
        source = ?registry.source(),
        "loaded dataset registry"
    );
    Ok(registry)
}

fn ingest_options(args: &IngestArgs) -> Result<IngestOptions> {
    let options = IngestOptions {
        thresholds: HeaderThresholds {
            single_row: args.single_row_threshold,
            two_row: args.two_row_threshold,
        },
        header_scan_rows: args.header_scan_rows,
        ..IngestOptions::default()
    };
    options.validate().context("invalid ingest options")?;
    Ok(options)
}

fn open_database(path: &Path, registry: &DatasetRegistry, init: bool) -> Result<SqliteSink> {
    let mut sink = SqliteSink::open(path)
        .with_context(|| format!("open database {}", path.display()))?;
    if init {
        sink.apply_bootstrap_schema(registry.datasets())
            .context("apply bootstrap schema")?;
    }
    Ok(sink)
}

pub fn run_ingest(args: &IngestArgs) -> Result<IngestRun> {
    let options = ingest_options(args)?;
    let registry = load_registry(&args.registry)?;
    let mut sink = open_database(&args.database, &registry, args.init_db)?;

    let span = info_span!("ingest", files = args.files.len());
    let _guard = span.enter();
    let reports = args
        .files
        .iter()
        .map(|path| ingest_file(path, &registry, &options, &mut sink))
        .collect();
    Ok(IngestRun {
        database: args.database.clone(),
        reports,
    })
}

pub fn run_datasets(args: &RegistryArgs) -> Result<()> {
    let registry = load_registry(args)?;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Dataset"),
        header_cell("Sheet hint"),
        header_cell("Keywords"),
        header_cell("Table"),
        header_cell("Columns"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Right);
    for spec in &registry {
        let hint = if spec.sheet_hint.is_empty() {
            "-".to_string()
        } else {
            spec.sheet_hint.clone()
        };
        table.add_row(vec![
            Cell::new(spec.id.as_str()),
            Cell::new(hint),
            Cell::new(spec.required_keywords.join(", ")),
            Cell::new(&spec.table),
            Cell::new(spec.columns.len()),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_init_db(args: &InitDbArgs) -> Result<usize> {
    let registry = load_registry(&args.registry)?;
    let mut sink = SqliteSink::open(&args.database)
        .with_context(|| format!("open database {}", args.database.display()))?;
    let tables = sink
        .apply_bootstrap_schema(registry.datasets())
        .context("apply bootstrap schema")?;
    Ok(tables)
}
