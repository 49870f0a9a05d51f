#![deny(unsafe_code)]

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use clarity_model::{CanonicalColumn, ColumnSynonymMap, DatasetId, DatasetTypeSpec};
use tracing::debug;

use crate::config::{
    ColumnsFile, DatasetEntry, REGISTRY_SCHEMA, REGISTRY_SCHEMA_VERSION, RegistryFile,
};
use crate::embedded;
use crate::error::{RegistryError, Result};
use crate::paths::{COLUMNS_DIR, REGISTRY_FILE, config_dir_from_env};

const EMBEDDED_ROOT: &str = "<embedded>";

/// Where a registry was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrySource {
    Embedded,
    Directory(PathBuf),
}

/// Ordered catalog of dataset types.
///
/// Built once at startup and shared by reference; declaration order is
/// classification precedence.
#[derive(Debug, Clone)]
pub struct DatasetRegistry {
    datasets: Vec<DatasetTypeSpec>,
    source: RegistrySource,
}

impl DatasetRegistry {
    /// Builds a registry from already-constructed specs.
    pub fn new(datasets: Vec<DatasetTypeSpec>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for spec in &datasets {
            if !seen.insert(spec.id.as_str().to_string()) {
                return Err(RegistryError::DuplicateDataset {
                    id: spec.id.to_string(),
                });
            }
        }
        Ok(Self {
            datasets,
            source: RegistrySource::Embedded,
        })
    }

    /// Loads the registry compiled into the binary.
    pub fn load_default() -> Result<Self> {
        let root = PathBuf::from(EMBEDDED_ROOT);
        let datasets = build_specs(embedded::REGISTRY, &root, |file_name| {
            Ok(embedded::columns(file_name).map(str::to_string))
        })?;
        let mut registry = Self::new(datasets)?;
        registry.source = RegistrySource::Embedded;
        Ok(registry)
    }

    /// Loads `registry.toml` and `columns/*.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let registry_path = dir.join(REGISTRY_FILE);
        let contents = std::fs::read_to_string(&registry_path)
            .map_err(|e| RegistryError::io(&registry_path, e))?;
        let datasets = build_specs(&contents, dir, |file_name| {
            let path = dir.join(COLUMNS_DIR).join(file_name);
            match std::fs::read_to_string(&path) {
                Ok(contents) => Ok(Some(contents)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(RegistryError::io(path, e)),
            }
        })?;
        let mut registry = Self::new(datasets)?;
        registry.source = RegistrySource::Directory(dir.to_path_buf());
        Ok(registry)
    }

    /// Loads from `dir` when given, else from `CLARITY_CONFIG_DIR`, else the
    /// embedded default.
    pub fn load(dir: Option<&Path>) -> Result<Self> {
        if let Some(dir) = dir {
            return Self::load_from_dir(dir);
        }
        match config_dir_from_env() {
            Some(dir) => Self::load_from_dir(&dir),
            None => Self::load_default(),
        }
    }

    pub fn datasets(&self) -> &[DatasetTypeSpec] {
        &self.datasets
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DatasetTypeSpec> {
        self.datasets.iter()
    }

    pub fn get(&self, id: &str) -> Option<&DatasetTypeSpec> {
        self.datasets.iter().find(|spec| spec.id.as_str() == id)
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    pub fn source(&self) -> &RegistrySource {
        &self.source
    }
}

impl<'a> IntoIterator for &'a DatasetRegistry {
    type Item = &'a DatasetTypeSpec;
    type IntoIter = std::slice::Iter<'a, DatasetTypeSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.datasets.iter()
    }
}

fn build_specs<F>(registry_src: &str, root: &Path, load_columns: F) -> Result<Vec<DatasetTypeSpec>>
where
    F: Fn(&str) -> Result<Option<String>>,
{
    let registry_path = root.join(REGISTRY_FILE);
    let file = parse_registry(registry_src, &registry_path)?;
    validate_registry(&file, &registry_path)?;

    let mut specs = Vec::with_capacity(file.datasets.len());
    for entry in &file.datasets {
        let file_name = entry.columns_file();
        let columns_path = root.join(COLUMNS_DIR).join(&file_name);
        let contents = load_columns(&file_name)?.ok_or_else(|| RegistryError::MissingColumns {
            id: entry.id.clone(),
            path: columns_path.clone(),
        })?;
        let columns = parse_columns(&contents, &columns_path)?;
        let id = DatasetId::new(entry.id.clone()).map_err(|e| RegistryError::Columns {
            path: registry_path.clone(),
            source: e,
        })?;
        debug!(dataset = %id, columns = columns.len(), "loaded dataset type");
        specs.push(DatasetTypeSpec {
            id,
            sheet_hint: entry.sheet_hint.trim().to_string(),
            required_keywords: entry
                .required_keywords
                .iter()
                .map(|k| k.trim().to_string())
                .collect(),
            table: entry.table.trim().to_string(),
            columns,
        });
    }
    Ok(specs)
}

fn parse_registry(contents: &str, path: &Path) -> Result<RegistryFile> {
    toml::from_str(contents).map_err(|e| RegistryError::Toml {
        path: path.to_path_buf(),
        source: e,
    })
}

fn validate_registry(file: &RegistryFile, path: &Path) -> Result<()> {
    if file.registry.schema != REGISTRY_SCHEMA {
        return Err(RegistryError::invalid(
            path,
            format!("unsupported schema: {}", file.registry.schema),
        ));
    }
    if file.registry.schema_version != REGISTRY_SCHEMA_VERSION {
        return Err(RegistryError::invalid(
            path,
            format!(
                "unsupported schema_version: {}",
                file.registry.schema_version
            ),
        ));
    }
    if file.datasets.is_empty() {
        return Err(RegistryError::invalid(path, "no [[dataset]] entries"));
    }
    for entry in &file.datasets {
        validate_entry(entry, path)?;
    }
    Ok(())
}

fn validate_entry(entry: &DatasetEntry, path: &Path) -> Result<()> {
    let id = entry.id.trim();
    if id.is_empty() {
        return Err(RegistryError::invalid(path, "dataset with empty id"));
    }
    if entry.required_keywords.is_empty()
        || entry.required_keywords.iter().any(|k| k.trim().is_empty())
    {
        return Err(RegistryError::invalid(
            path,
            format!("dataset {id} needs non-empty required_keywords"),
        ));
    }
    if !is_table_name(entry.table.trim()) {
        return Err(RegistryError::invalid(
            path,
            format!("dataset {id} has invalid table name '{}'", entry.table),
        ));
    }
    Ok(())
}

/// Table names are interpolated into SQL, so only `[A-Za-z_][A-Za-z0-9_]*`.
fn is_table_name(value: &str) -> bool {
    let mut chars = value.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

fn parse_columns(contents: &str, path: &Path) -> Result<ColumnSynonymMap> {
    let file: ColumnsFile = toml::from_str(contents).map_err(|e| RegistryError::Toml {
        path: path.to_path_buf(),
        source: e,
    })?;
    if file.columns.is_empty() {
        return Err(RegistryError::invalid(path, "no [[column]] entries"));
    }
    let columns = file
        .columns
        .into_iter()
        .map(|entry| {
            if !is_table_name(entry.name.trim()) {
                return Err(RegistryError::invalid(
                    path,
                    format!("invalid canonical column name '{}'", entry.name),
                ));
            }
            CanonicalColumn::new(entry.name, entry.headers).map_err(|e| RegistryError::Columns {
                path: path.to_path_buf(),
                source: e,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    ColumnSynonymMap::new(columns).map_err(|e| RegistryError::Columns {
        path: path.to_path_buf(),
        source: e,
    })
}
