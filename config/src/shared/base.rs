use std::io;

use thiserror::Error;

/// Result type for replicator request mapping and resolution.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors produced while mapping a replicator request onto a [`ReplicationConfig`].
///
/// Every variant is terminal for the current request: no partially mapped
/// configuration is ever returned. The messages are meant to be surfaced to the
/// client verbatim.
///
/// [`ReplicationConfig`]: crate::shared::ReplicationConfig
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required field is absent or `null`.
    #[error("Missing required field `{0}`")]
    MissingField(&'static str),

    /// A field holds a string outside its set of accepted values.
    #[error("Invalid value `{value}` for field `{field}`")]
    InvalidEnumValue { field: &'static str, value: String },

    /// A field holds a JSON value of the wrong type.
    #[error("Field `{field}` must be a {expected}")]
    TypeMismatch {
        field: &'static str,
        expected: &'static str,
    },

    /// The replication target is not an absolute URI.
    #[error("Invalid target URI `{value}`: {source}")]
    InvalidUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },

    /// The request payload is not valid JSON.
    #[error("Invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The catalog has no database with the requested name.
    #[error("Database not found: {0}")]
    DatabaseNotFound(String),

    /// The pinned certificate reference could not be read.
    #[error("Failed to load certificate: {reference}")]
    CertificateResolutionFailed {
        reference: String,
        #[source]
        source: io::Error,
    },
}

/// Validation errors for the replicator service settings.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// No database is exposed to replication requests.
    #[error("`databases` must list at least one database")]
    NoDatabases,
    /// A listed database name is empty.
    #[error("`databases` cannot contain an empty name")]
    EmptyDatabaseName,
    /// The certificate asset directory is empty.
    #[error("`assets_dir` cannot be empty")]
    EmptyAssetsDir,
}
