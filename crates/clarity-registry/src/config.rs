//! On-disk layout of the registry and column synonym files.

#![deny(unsafe_code)]

use serde::{Deserialize, Serialize};

/// Expected value of `registry.schema`.
pub const REGISTRY_SCHEMA: &str = "clarity-registry";
/// Highest supported `registry.schema_version`.
pub const REGISTRY_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryFile {
    pub registry: RegistryHeader,
    #[serde(default, rename = "dataset")]
    pub datasets: Vec<DatasetEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryHeader {
    pub schema: String,
    pub schema_version: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetEntry {
    pub id: String,
    #[serde(default)]
    pub sheet_hint: String,
    pub required_keywords: Vec<String>,
    pub table: String,
    /// Synonym file under `columns/`; defaults to `<id>.toml`.
    #[serde(default)]
    pub columns: Option<String>,
}

impl DatasetEntry {
    pub fn columns_file(&self) -> String {
        self.columns
            .clone()
            .unwrap_or_else(|| format!("{}.toml", self.id.trim()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnsFile {
    #[serde(default, rename = "column")]
    pub columns: Vec<ColumnEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnEntry {
    pub name: String,
    pub headers: Vec<String>,
}
