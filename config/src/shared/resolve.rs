use std::collections::HashMap;
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info};

use crate::shared::{ConfigError, ConfigResult, ReplicationConfig};

/// Looks up local databases by name.
pub trait DatabaseCatalog {
    /// Handle passed on to the replication engine.
    type Database;

    /// Returns the database called `name`, or `None` if it is not open.
    fn lookup_database(&self, name: &str) -> Option<Self::Database>;
}

/// Resolves pinned certificate references into certificate bytes.
pub trait CertificateSource {
    fn resolve_certificate_bytes(&self, reference: &str) -> io::Result<Vec<u8>>;
}

/// Catalog backed by an in-memory map of database handles.
#[derive(Debug, Clone)]
pub struct InMemoryDatabaseCatalog<D> {
    databases: HashMap<String, D>,
}

impl<D> InMemoryDatabaseCatalog<D> {
    pub fn new() -> Self {
        Self {
            databases: HashMap::new(),
        }
    }

    /// Registers `database` under `name`, returning the handle it replaced.
    pub fn insert(&mut self, name: impl Into<String>, database: D) -> Option<D> {
        self.databases.insert(name.into(), database)
    }
}

impl<D> Default for InMemoryDatabaseCatalog<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D, N: Into<String>> FromIterator<(N, D)> for InMemoryDatabaseCatalog<D> {
    fn from_iter<I: IntoIterator<Item = (N, D)>>(iter: I) -> Self {
        Self {
            databases: iter
                .into_iter()
                .map(|(name, database)| (name.into(), database))
                .collect(),
        }
    }
}

impl<D: Clone> DatabaseCatalog for InMemoryDatabaseCatalog<D> {
    type Database = D;

    fn lookup_database(&self, name: &str) -> Option<D> {
        self.databases.get(name).cloned()
    }
}

/// Certificate source reading files below a fixed asset directory.
///
/// References are relative paths. Absolute paths and paths that step outside the
/// directory through `..` are rejected with [`io::ErrorKind::InvalidInput`].
#[derive(Debug, Clone)]
pub struct AssetDirectory {
    root: PathBuf,
}

impl AssetDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn asset_path(&self, reference: &str) -> io::Result<PathBuf> {
        let relative = Path::new(reference);
        let is_contained = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));

        if reference.is_empty() || !is_contained {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("asset reference `{reference}` must be a relative path inside the asset directory"),
            ));
        }

        Ok(self.root.join(relative))
    }
}

impl CertificateSource for AssetDirectory {
    fn resolve_certificate_bytes(&self, reference: &str) -> io::Result<Vec<u8>> {
        let path = self.asset_path(reference)?;
        debug!(path = %path.display(), "reading pinned certificate");

        std::fs::read(path)
    }
}

/// A [`ReplicationConfig`] together with the collaborators' answers for it.
#[derive(Debug, Clone)]
pub struct ResolvedReplicatorConfig<D> {
    config: ReplicationConfig,
    database: D,
    pinned_server_certificate: Option<Vec<u8>>,
}

impl<D> ResolvedReplicatorConfig<D> {
    pub fn config(&self) -> &ReplicationConfig {
        &self.config
    }

    pub fn database(&self) -> &D {
        &self.database
    }

    /// Bytes of the pinned server certificate, if the config references one.
    pub fn pinned_server_certificate(&self) -> Option<&[u8]> {
        self.pinned_server_certificate.as_deref()
    }

    pub fn into_parts(self) -> (ReplicationConfig, D, Option<Vec<u8>>) {
        (self.config, self.database, self.pinned_server_certificate)
    }
}

impl ReplicationConfig {
    /// Resolves the database handle and the pinned certificate bytes for this config.
    ///
    /// The database is looked up first; a failure there is reported before the
    /// certificate is touched.
    pub fn resolve<C, S>(
        self,
        catalog: &C,
        certificates: &S,
    ) -> ConfigResult<ResolvedReplicatorConfig<C::Database>>
    where
        C: DatabaseCatalog + ?Sized,
        S: CertificateSource + ?Sized,
    {
        let database = catalog
            .lookup_database(self.database_name())
            .ok_or_else(|| ConfigError::DatabaseNotFound(self.database_name().to_owned()))?;

        let pinned_server_certificate = self
            .pinned_server_certificate()
            .map(|reference| {
                certificates
                    .resolve_certificate_bytes(reference)
                    .map_err(|source| ConfigError::CertificateResolutionFailed {
                        reference: reference.to_owned(),
                        source,
                    })
            })
            .transpose()?;

        info!(
            database = self.database_name(),
            target = self.target_url(),
            pinned_certificate_bytes = pinned_server_certificate.as_ref().map(Vec::len),
            "resolved replicator config"
        );

        Ok(ResolvedReplicatorConfig {
            config: self,
            database,
            pinned_server_certificate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_path_rejects_escaping_references() {
        let assets = AssetDirectory::new("/srv/assets");

        for reference in ["", "/etc/passwd", "../secret.pem", "certs/../../secret.pem"] {
            let err = assets.asset_path(reference).unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::InvalidInput, "{reference}");
        }
    }

    #[test]
    fn test_asset_path_joins_relative_references() {
        let assets = AssetDirectory::new("/srv/assets");

        assert_eq!(
            assets.asset_path("certs/server.cer").unwrap(),
            PathBuf::from("/srv/assets/certs/server.cer")
        );
    }

    #[test]
    fn test_in_memory_catalog_lookup() {
        let catalog: InMemoryDatabaseCatalog<u32> = [("db1", 1), ("db2", 2)].into_iter().collect();

        assert_eq!(catalog.lookup_database("db1"), Some(1));
        assert_eq!(catalog.lookup_database("db2"), Some(2));
        assert_eq!(catalog.lookup_database("DB2"), None);
    }
}
