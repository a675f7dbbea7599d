use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::Config;
use crate::shared::{AssetDirectory, InMemoryDatabaseCatalog, ValidationError};

/// Service settings of the replicator binary.
///
/// Loaded with [`load_config`](crate::load_config) at startup. Requests may only
/// replicate the databases listed here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplicatorSettings {
    /// Directory pinned certificate references are resolved against.
    pub assets_dir: PathBuf,
    /// Names of the local databases open for replication.
    pub databases: Vec<String>,
}

impl ReplicatorSettings {
    /// Validates the settings.
    ///
    /// Ensures at least one non-empty database name and a non-empty asset directory.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.databases.is_empty() {
            return Err(ValidationError::NoDatabases);
        }

        if self.databases.iter().any(|name| name.trim().is_empty()) {
            return Err(ValidationError::EmptyDatabaseName);
        }

        if self.assets_dir.as_os_str().is_empty() {
            return Err(ValidationError::EmptyAssetsDir);
        }

        Ok(())
    }

    /// Builds a catalog whose handles are the database names themselves.
    pub fn database_catalog(&self) -> InMemoryDatabaseCatalog<String> {
        self.databases
            .iter()
            .map(|name| (name.clone(), name.clone()))
            .collect()
    }

    pub fn asset_directory(&self) -> AssetDirectory {
        AssetDirectory::new(self.assets_dir.clone())
    }
}

impl Config for ReplicatorSettings {
    const LIST_PARSE_KEYS: &'static [&'static str] = &["databases"];
}
