//! Where the store finds its scripts and where exports land by default.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use directories::BaseDirs;

/// Schema script creating the `BOOKS` table, relative to the working directory.
pub const SCHEMA_SCRIPT: &str = "resources/schema.sql";
/// Seed data loaded on startup unless another data script is given.
pub const DATA_SCRIPT: &str = "resources/default.sql";
/// Folder name used beneath the user's home directory for exports.
const DATA_DIR_NAME: &str = ".book-catalog";
/// File name for exports when the caller does not pick one.
const EXPORT_FILE_NAME: &str = "books.sql";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Script locations for a store. The schema path stays fixed for the life of
/// the store; the data path is only the initial one, since reloads take their
/// own path.
pub struct StoreConfig {
    pub schema_path: PathBuf,
    pub data_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            schema_path: PathBuf::from(SCHEMA_SCRIPT),
            data_path: PathBuf::from(DATA_SCRIPT),
        }
    }
}

impl StoreConfig {
    /// Override either path, keeping the default for the one left out.
    pub fn with_paths(schema_path: Option<PathBuf>, data_path: Option<PathBuf>) -> Self {
        let defaults = Self::default();
        Self {
            schema_path: schema_path.unwrap_or(defaults.schema_path),
            data_path: data_path.unwrap_or(defaults.data_path),
        }
    }
}

/// Resolve the default export destination inside the user's home.
pub fn default_export_path() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs
        .home_dir()
        .join(DATA_DIR_NAME)
        .join(EXPORT_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_only_given_paths() {
        let config = StoreConfig::with_paths(None, Some(PathBuf::from("backup.sql")));
        assert_eq!(config.schema_path, PathBuf::from(SCHEMA_SCRIPT));
        assert_eq!(config.data_path, PathBuf::from("backup.sql"));
    }
}
