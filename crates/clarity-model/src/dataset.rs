//! Dataset type definitions and their column synonym tables.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::{ModelError, Result};
use crate::ids::DatasetId;

/// Canonical column carrying the subject identifier.
pub const SUBJECT_ID: &str = "subject_id";
/// Canonical column carrying the site identifier.
pub const SITE_ID: &str = "site_id";
/// Canonical column carrying the study name.
pub const STUDY_NAME: &str = "study_name";

/// A canonical column and the header spellings that resolve to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalColumn {
    pub name: String,
    /// Header spellings in match priority order, as configured.
    pub headers: Vec<String>,
    /// Trimmed, lower-cased spellings in the same order.
    #[serde(skip_serializing)]
    normalized: Vec<String>,
}

impl CanonicalColumn {
    pub fn new(name: impl Into<String>, headers: Vec<String>) -> Result<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ModelError::InvalidColumnName(name));
        }
        let normalized: Vec<String> = headers
            .iter()
            .map(|h| h.trim().to_lowercase())
            .filter(|h| !h.is_empty())
            .collect();
        if normalized.is_empty() {
            return Err(ModelError::NoHeaders { column: name });
        }
        Ok(Self {
            name,
            headers,
            normalized,
        })
    }

    /// Lower-cased spellings used for case-insensitive matching.
    pub fn match_keys(&self) -> &[String] {
        &self.normalized
    }
}

/// Canonical column name to ordered header spellings, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnSynonymMap {
    columns: Vec<CanonicalColumn>,
}

impl ColumnSynonymMap {
    pub fn new(columns: Vec<CanonicalColumn>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(ModelError::DuplicateColumn(column.name.clone()));
            }
        }
        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[CanonicalColumn] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&CanonicalColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}

/// One recognized report category and where its rows are persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetTypeSpec {
    pub id: DatasetId,
    /// Substring expected in the sheet name.
    pub sheet_hint: String,
    /// Strings that must all appear in the sheet's leading rows.
    pub required_keywords: Vec<String>,
    /// Destination table name.
    pub table: String,
    pub columns: ColumnSynonymMap,
}

impl DatasetTypeSpec {
    /// Lower-cased sheet hint, or `None` when no hint is configured.
    pub fn sheet_hint_key(&self) -> Option<String> {
        let hint = self.sheet_hint.trim();
        (!hint.is_empty()).then(|| hint.to_lowercase())
    }

    /// Lower-cased required keywords.
    pub fn keyword_keys(&self) -> Vec<String> {
        self.required_keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_column_normalizes_headers() {
        let column = CanonicalColumn::new(
            "lab_category",
            vec!["  Lab Category ".to_string(), String::new()],
        )
        .unwrap();
        assert_eq!(column.match_keys(), &["lab category".to_string()]);
        assert_eq!(column.headers.len(), 2);
    }

    #[test]
    fn canonical_column_requires_a_spelling() {
        let err = CanonicalColumn::new("issue", vec![" ".to_string()]).unwrap_err();
        assert_eq!(
            err,
            ModelError::NoHeaders {
                column: "issue".to_string()
            }
        );
    }

    #[test]
    fn synonym_map_rejects_duplicates() {
        let a = CanonicalColumn::new("issue", vec!["Issue".to_string()]).unwrap();
        let err = ColumnSynonymMap::new(vec![a.clone(), a]).unwrap_err();
        assert_eq!(err, ModelError::DuplicateColumn("issue".to_string()));
    }
}
