//! Dataset registry and per-dataset column synonym tables.
//!
//! The registry is static configuration: an ordered list of dataset types,
//! each with a sheet-name hint, required keywords, a destination table and a
//! synonym table mapping canonical columns to accepted header spellings.
//! Defaults are embedded; a directory with the same layout can replace them.
//!
//! ```text
//! <dir>/registry.toml
//! <dir>/columns/<dataset id>.toml
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod embedded;
pub mod error;
pub mod paths;
pub mod registry;

pub use crate::error::{RegistryError, Result};
pub use crate::paths::{CONFIG_ENV_VAR, config_dir_from_env};
pub use crate::registry::{DatasetRegistry, RegistrySource};
