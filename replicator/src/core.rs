use std::io::{self, Read};
use std::path::Path;

use replication_config::shared::{
    ReplicationConfig, ReplicationConfigWithoutSecrets, ReplicatorSettings,
};
use tracing::info;

use crate::error::ReplicatorResult;

/// Reads the raw replicator request from `path`, or from stdin when no path is given.
pub fn read_request(path: Option<&Path>) -> io::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut request = String::new();
            io::stdin().read_to_string(&mut request)?;
            Ok(request)
        }
    }
}

/// Maps and resolves a replicator request against the configured databases and assets.
///
/// Returns `None` when the request carries no config, otherwise the secret-free view
/// of the configuration handed to the replication engine.
pub fn run_replicator(
    settings: &ReplicatorSettings,
    request: &str,
) -> ReplicatorResult<Option<ReplicationConfigWithoutSecrets>> {
    let Some(config) = ReplicationConfig::parse_str(request)? else {
        return Ok(None);
    };

    let catalog = settings.database_catalog();
    let assets = settings.asset_directory();
    let resolved = config.resolve(&catalog, &assets)?;

    let (config, database, certificate) = resolved.into_parts();
    info!(
        %database,
        endpoint = %config.endpoint(),
        replicator_type = config.replicator_type().map(|kind| kind.as_str()),
        continuous = config.is_continuous(),
        authenticator = config
            .authenticator()
            .map(|authenticator| authenticator.method().as_str()),
        pinned_certificate = certificate.is_some(),
        "replicator configured"
    );

    Ok(Some(config.into()))
}
