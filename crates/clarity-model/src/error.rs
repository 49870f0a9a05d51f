use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("invalid dataset id: {0:?}")]
    InvalidDatasetId(String),
    #[error("invalid canonical column name: {0:?}")]
    InvalidColumnName(String),
    #[error("canonical column '{column}' has no header spellings")]
    NoHeaders { column: String },
    #[error("canonical column '{0}' is declared twice")]
    DuplicateColumn(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
