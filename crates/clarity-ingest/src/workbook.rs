//! Multi-sheet workbooks (xlsx, xlsm, xlsb, xls, ods) via calamine.

use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};
use chrono::NaiveDateTime;
use clarity_model::{CellValue, RawSheet};

use crate::error::{IngestError, Result};

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Reads every sheet of a workbook in workbook order.
pub fn read_workbook(path: &Path) -> Result<Vec<RawSheet>> {
    let mut workbook = open_workbook_auto(path).map_err(|source| IngestError::Workbook {
        path: path.to_path_buf(),
        source,
    })?;

    let names = workbook.sheet_names().to_vec();
    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|source| IngestError::Sheet {
                path: path.to_path_buf(),
                sheet: name.clone(),
                source,
            })?;
        let rows = range_to_rows(&range);
        tracing::debug!(sheet = %name, rows = rows.len(), "read worksheet");
        sheets.push(RawSheet::new(name, rows));
    }
    Ok(sheets)
}

/// Converts a used range to a grid anchored at A1.
///
/// Calamine ranges start at the first used cell; leading empty rows and
/// columns are restored so row indices match the sheet.
fn range_to_rows(range: &Range<Data>) -> Vec<Vec<CellValue>> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };
    let mut rows = vec![Vec::new(); start_row as usize];
    for row in range.rows() {
        let mut cells = vec![CellValue::Empty; start_col as usize];
        cells.extend(row.iter().map(convert_cell));
        rows.push(cells);
    }
    rows
}

fn format_datetime(value: &NaiveDateTime) -> String {
    value.format(DATETIME_FORMAT).to_string()
}

/// Maps a calamine cell to a [`CellValue`].
pub fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::from(s.as_str()),
        Data::Int(v) => CellValue::Int(*v),
        Data::Float(v) => CellValue::Float(*v),
        Data::Bool(v) => CellValue::Bool(*v),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) => CellValue::DateTime(format_datetime(&value)),
            None => CellValue::Float(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::DateTime(s.clone()),
        Data::Error(e) => CellValue::Error(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_scalar_cells() {
        assert_eq!(convert_cell(&Data::Empty), CellValue::Empty);
        assert_eq!(convert_cell(&Data::String(String::new())), CellValue::Empty);
        assert_eq!(
            convert_cell(&Data::String("Subject".to_string())),
            CellValue::Text("Subject".to_string())
        );
        assert_eq!(convert_cell(&Data::Float(1023.0)), CellValue::Float(1023.0));
        assert_eq!(convert_cell(&Data::Int(7)), CellValue::Int(7));
        assert_eq!(convert_cell(&Data::Bool(true)), CellValue::Bool(true));
    }

    #[test]
    fn test_error_cells_are_blank() {
        let cell = convert_cell(&Data::Error(calamine::CellErrorType::NA));
        assert!(cell.is_blank());
    }

    #[test]
    fn test_range_offset_is_restored() {
        let mut range = Range::new((2, 1), (3, 2));
        range.set_value((2, 1), Data::String("Subject".to_string()));
        range.set_value((3, 2), Data::Float(5.0));

        let rows = range_to_rows(&range);
        assert_eq!(rows.len(), 4);
        assert!(rows[0].is_empty());
        assert_eq!(rows[2][0], CellValue::Empty);
        assert_eq!(rows[2][1], CellValue::Text("Subject".to_string()));
        assert_eq!(rows[3][2], CellValue::Float(5.0));
    }

    #[test]
    fn test_empty_range_has_no_rows() {
        let range: Range<Data> = Range::empty();
        assert!(range_to_rows(&range).is_empty());
    }
}
