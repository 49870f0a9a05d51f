#![deny(unsafe_code)]

use std::path::PathBuf;

use clarity_model::ModelError;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid registry {path}: {message}")]
    InvalidRegistry { path: PathBuf, message: String },

    #[error("duplicate dataset id in registry: {id}")]
    DuplicateDataset { id: String },

    #[error("missing column synonym file for dataset {id}: {path}")]
    MissingColumns { id: String, path: PathBuf },

    #[error("invalid column synonyms in {path}: {source}")]
    Columns {
        path: PathBuf,
        #[source]
        source: ModelError,
    },
}

impl RegistryError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidRegistry {
            path: path.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;
