use replication_config::load_config;
use replication_config::shared::ReplicatorSettings;

use crate::error::{ReplicatorError, ReplicatorResult};

/// Loads and validates the replicator service settings.
///
/// Uses the layered loader from [`replication_config`] and validates the resulting
/// [`ReplicatorSettings`] before returning them.
pub fn load_replicator_settings() -> ReplicatorResult<ReplicatorSettings> {
    let settings = load_config::<ReplicatorSettings>().map_err(ReplicatorError::config)?;
    settings.validate().map_err(ReplicatorError::config)?;

    Ok(settings)
}
