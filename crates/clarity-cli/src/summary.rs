use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use clarity_model::{DatasetId, FileReport, FileStatus, OutcomeStatus, SheetOutcome};

use crate::types::{IngestRun, UploadSummary};

pub fn print_summary(run: &IngestRun) {
    println!("Database: {}", run.database.display());
    println!("{}", build_summary_table(run));
}

pub fn print_json_summary(run: &IngestRun) -> serde_json::Result<()> {
    let body = UploadSummary {
        summary: &run.reports,
    };
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

fn build_summary_table(run: &IngestRun) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Sheet"),
        header_cell("Dataset"),
        header_cell("Table"),
        header_cell("Status"),
        header_cell("Rows"),
        header_cell("Details"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Center);
    align_column(&mut table, 5, CellAlignment::Right);

    for report in &run.reports {
        if report.sheets.is_empty() {
            table.add_row(vec![
                Cell::new(&report.file),
                dim_cell("-"),
                dim_cell("-"),
                dim_cell("-"),
                file_status_cell(report.status),
                dim_cell("-"),
                Cell::new(report.reason.clone().unwrap_or_default()),
            ]);
            continue;
        }
        for sheet in &report.sheets {
            table.add_row(vec![
                Cell::new(&report.file),
                Cell::new(&sheet.sheet),
                Cell::new(sheet.dataset.as_str())
                    .fg(Color::Blue)
                    .add_attribute(Attribute::Bold),
                Cell::new(&sheet.table),
                sheet_status_cell(sheet.status),
                rows_cell(sheet),
                Cell::new(sheet_details(sheet)),
            ]);
        }
    }

    table.add_row(vec![
        Cell::new("TOTAL").add_attribute(Attribute::Bold),
        dim_cell(format!("{} files", run.reports.len())),
        dim_cell("-"),
        dim_cell("-"),
        total_status_cell(&run.reports),
        Cell::new(run.rows_ingested()).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    table
}

fn sheet_details(sheet: &SheetOutcome) -> String {
    let mut details = sheet.message.clone();
    if !sheet.ambiguous_with.is_empty() {
        let others: Vec<&str> = sheet.ambiguous_with.iter().map(DatasetId::as_str).collect();
        details.push_str(&format!("\nAlso matched: {}", others.join(", ")));
    }
    if let Some(kind) = sheet.kind {
        details.push_str(&format!("\n[{}]", kind.as_str()));
    }
    details
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
    if table.column_count() >= 7 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Percentage(20)),
            ColumnConstraint::UpperBoundary(Width::Fixed(24)),
            ColumnConstraint::UpperBoundary(Width::Fixed(28)),
            ColumnConstraint::UpperBoundary(Width::Fixed(28)),
            ColumnConstraint::LowerBoundary(Width::Fixed(9)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::UpperBoundary(Width::Percentage(40)),
        ]);
    }
}

pub fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn sheet_status_cell(status: OutcomeStatus) -> Cell {
    match status {
        OutcomeStatus::Success => Cell::new("OK").fg(Color::Green),
        OutcomeStatus::Warning => Cell::new("WARN").fg(Color::Yellow),
        OutcomeStatus::Skipped => dim_cell("SKIP"),
        OutcomeStatus::Error => Cell::new("ERROR")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
    }
}

fn file_status_cell(status: FileStatus) -> Cell {
    match status {
        FileStatus::Processed => Cell::new("OK").fg(Color::Green),
        FileStatus::Skipped => dim_cell("SKIP"),
        FileStatus::Error => Cell::new("ERROR")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
    }
}

fn total_status_cell(reports: &[FileReport]) -> Cell {
    let errors = reports.iter().filter(|r| r.has_errors()).count();
    if errors > 0 {
        Cell::new(format!("{errors} failed"))
            .fg(Color::Red)
            .add_attribute(Attribute::Bold)
    } else {
        Cell::new("OK").fg(Color::Green)
    }
}

fn rows_cell(sheet: &SheetOutcome) -> Cell {
    match sheet.status {
        OutcomeStatus::Success if sheet.rows > 0 => Cell::new(sheet.rows)
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        OutcomeStatus::Success => dim_cell(0),
        _ => dim_cell("-"),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
