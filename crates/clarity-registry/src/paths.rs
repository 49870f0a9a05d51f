//! Configuration directory resolution.

use std::path::PathBuf;

/// Environment variable for overriding the embedded registry.
pub const CONFIG_ENV_VAR: &str = "CLARITY_CONFIG_DIR";

/// File name of the registry inside a configuration directory.
pub const REGISTRY_FILE: &str = "registry.toml";

/// Directory holding one synonym file per dataset type.
pub const COLUMNS_DIR: &str = "columns";

/// Returns the override directory from `CLARITY_CONFIG_DIR`, if set.
pub fn config_dir_from_env() -> Option<PathBuf> {
    std::env::var_os(CONFIG_ENV_VAR)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}
