//! Bootstrap DDL for a local SQLite store.
//!
//! The ingest core never creates tables; this is for standing up an empty
//! database whose fact tables carry every canonical column of the registry.

use clarity_model::{DatasetTypeSpec, SUBJECT_ID};

/// Master subject table that fact rows reference.
pub const SUBJECTS_TABLE: &str = "subjects";

/// Surrogate key of every bootstrap fact table.
pub const ROW_ID_COLUMN: &str = "row_id";

/// Quotes an SQL identifier.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn subjects_ddl() -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {SUBJECTS_TABLE} (\n    \
         subject_id TEXT PRIMARY KEY NOT NULL,\n    \
         site_id TEXT,\n    \
         study_name TEXT\n)"
    )
}

fn fact_ddl(table: &str, columns: &[&str]) -> String {
    let mut defs = vec![format!("{ROW_ID_COLUMN} INTEGER PRIMARY KEY AUTOINCREMENT")];
    for column in columns {
        if *column == ROW_ID_COLUMN {
            continue;
        }
        if *column == SUBJECT_ID {
            defs.push(format!(
                "{} TEXT REFERENCES {SUBJECTS_TABLE}(subject_id)",
                quote_ident(column)
            ));
        } else {
            defs.push(quote_ident(column));
        }
    }
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
        quote_ident(table),
        defs.join(",\n    ")
    )
}

/// `CREATE TABLE IF NOT EXISTS` statements for the subject table and one
/// fact table per destination, in registry order.
///
/// Dataset types sharing a destination table contribute the union of their
/// canonical columns.
pub fn bootstrap_statements(specs: &[DatasetTypeSpec]) -> Vec<String> {
    let mut tables: Vec<(&str, Vec<&str>)> = Vec::new();
    for spec in specs {
        let index = match tables.iter().position(|(t, _)| *t == spec.table) {
            Some(index) => index,
            None => {
                tables.push((spec.table.as_str(), Vec::new()));
                tables.len() - 1
            }
        };
        let columns = &mut tables[index].1;
        for name in spec.columns.names() {
            if !columns.contains(&name) {
                columns.push(name);
            }
        }
    }

    std::iter::once(subjects_ddl())
        .chain(
            tables
                .iter()
                .map(|(table, columns)| fact_ddl(table, columns)),
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use clarity_model::{CanonicalColumn, ColumnSynonymMap, DatasetId};

    use super::*;

    fn spec(id: &str, table: &str, columns: &[&str]) -> DatasetTypeSpec {
        DatasetTypeSpec {
            id: DatasetId::new(id).unwrap(),
            sheet_hint: String::new(),
            required_keywords: vec!["x".to_string()],
            table: table.to_string(),
            columns: ColumnSynonymMap::new(
                columns
                    .iter()
                    .map(|c| CanonicalColumn::new(*c, vec![c.to_string()]).unwrap())
                    .collect(),
            )
            .unwrap(),
        }
    }

    #[test]
    fn quote_ident_escapes_quotes() {
        assert_eq!(quote_ident("issue"), "\"issue\"");
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn shared_tables_merge_columns() {
        let statements = bootstrap_statements(&[
            spec("a", "raw_t", &["subject_id", "issue"]),
            spec("b", "raw_t", &["issue", "status"]),
            spec("c", "raw_u", &["form"]),
        ]);
        assert_eq!(statements.len(), 3);
        assert!(statements[0].contains("CREATE TABLE IF NOT EXISTS subjects"));
        assert!(statements[1].contains("\"raw_t\""));
        assert!(statements[1].contains("\"subject_id\" TEXT REFERENCES subjects(subject_id)"));
        assert_eq!(statements[1].matches("\"issue\"").count(), 1);
        assert!(statements[1].contains("\"status\""));
        assert!(!statements[2].contains("REFERENCES"));
    }
}
