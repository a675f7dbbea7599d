use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};
use url::Url;

use crate::shared::fields::{FieldReader, json_kind, value_to_string};
use crate::shared::{
    Authenticator, AuthenticatorWithoutSecrets, ConfigError, ConfigResult,
};

const CONFIG_KEY: &str = "config";
const DATABASE_FIELD: &str = "database";
const TARGET_FIELD: &str = "target";
const REPLICATOR_TYPE_FIELD: &str = "replicatorType";
const CONTINUOUS_FIELD: &str = "continuous";
const PINNED_SERVER_CERTIFICATE_FIELD: &str = "pinnedServerCertificate";
const AUTHENTICATOR_FIELD: &str = "authenticator";
const DOCUMENT_IDS_FIELD: &str = "documentIds";

const PUSH: &str = "PUSH";
const PULL: &str = "PULL";
const PUSH_AND_PULL: &str = "PUSH_AND_PULL";

/// Direction in which documents flow between the local database and the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReplicatorType {
    /// Local changes are sent to the target.
    Push,
    /// Remote changes are fetched from the target.
    Pull,
    /// Both directions.
    PushAndPull,
}

impl ReplicatorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplicatorType::Push => PUSH,
            ReplicatorType::Pull => PULL,
            ReplicatorType::PushAndPull => PUSH_AND_PULL,
        }
    }
}

impl fmt::Display for ReplicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReplicatorType {
    type Err = ConfigError;

    /// Parses `PUSH`, `PULL` or `PUSH_AND_PULL`. Matching is case-sensitive.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            PUSH => Ok(Self::Push),
            PULL => Ok(Self::Pull),
            PUSH_AND_PULL => Ok(Self::PushAndPull),
            other => Err(ConfigError::InvalidEnumValue {
                field: REPLICATOR_TYPE_FIELD,
                value: other.to_owned(),
            }),
        }
    }
}

/// Validated replicator configuration handed to the replication engine.
///
/// Built once from a JSON request through [`ReplicationConfig::parse`] and never
/// mutated afterwards. A value of this type always carries a database name and a
/// target that parses as an absolute URI.
///
/// This intentionally does not implement [`Serialize`] to avoid accidentally
/// leaking secrets in the authenticator into serialized forms.
#[derive(Debug, Clone)]
pub struct ReplicationConfig {
    database_name: String,
    target_url: String,
    endpoint: Url,
    replicator_type: Option<ReplicatorType>,
    continuous: bool,
    pinned_server_certificate: Option<String>,
    authenticator: Option<Authenticator>,
    document_ids: Option<Vec<String>>,
}

impl ReplicationConfig {
    /// Maps a decoded replicator request onto a [`ReplicationConfig`].
    ///
    /// Returns `Ok(None)` when the request has no `config` key, which callers treat
    /// as "replication disabled". A `config` value that is not an object, `null`
    /// included, is read as an empty object and therefore fails on the first
    /// required field.
    pub fn parse(raw: &Value) -> ConfigResult<Option<Self>> {
        let Some(config) = raw.get(CONFIG_KEY) else {
            debug!("replicator request has no config");
            return Ok(None);
        };

        let empty = Map::new();
        let object = match config {
            Value::Object(object) => object,
            other => {
                warn!(found = json_kind(other), "replicator config is not an object");
                &empty
            }
        };

        Self::from_config_object(object).map(Some)
    }

    /// Decodes `json` and maps it with [`ReplicationConfig::parse`].
    pub fn parse_str(json: &str) -> ConfigResult<Option<Self>> {
        let raw: Value = serde_json::from_str(json)?;
        Self::parse(&raw)
    }

    /// Maps the contents of an already extracted `config` object.
    ///
    /// Malformed `authenticator` (not an object) and `documentIds` (not a list) values
    /// are ignored rather than rejected, every other field is strictly typed.
    pub fn from_config_object(object: &Map<String, Value>) -> ConfigResult<Self> {
        let fields = FieldReader::new(object);

        let database_name = fields.required_str(DATABASE_FIELD)?.to_owned();
        let target_url = fields.required_str(TARGET_FIELD)?.to_owned();
        let endpoint = Url::parse(&target_url).map_err(|source| ConfigError::InvalidUrl {
            value: target_url.clone(),
            source,
        })?;

        let replicator_type = fields
            .optional_str(REPLICATOR_TYPE_FIELD)?
            .map(str::parse::<ReplicatorType>)
            .transpose()?;
        let continuous = fields.optional_bool(CONTINUOUS_FIELD)?.unwrap_or(false);
        let pinned_server_certificate = fields
            .optional_str(PINNED_SERVER_CERTIFICATE_FIELD)?
            .map(str::to_owned);
        let authenticator = fields
            .lenient_object(AUTHENTICATOR_FIELD)
            .map(Authenticator::parse)
            .transpose()?;
        // `null` entries name no document and are dropped.
        let document_ids = fields.lenient_array(DOCUMENT_IDS_FIELD).map(|ids| {
            ids.iter()
                .filter(|id| !id.is_null())
                .map(value_to_string)
                .collect::<Vec<_>>()
        });

        debug!(
            database = %database_name,
            target = %target_url,
            replicator_type = ?replicator_type,
            continuous,
            authenticator = ?authenticator.as_ref().map(Authenticator::method),
            document_ids = document_ids.as_ref().map(Vec::len),
            "mapped replicator config"
        );

        Ok(Self {
            database_name,
            target_url,
            endpoint,
            replicator_type,
            continuous,
            pinned_server_certificate,
            authenticator,
            document_ids,
        })
    }

    /// Name of the local database to replicate.
    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    /// Target endpoint exactly as given in the request.
    pub fn target_url(&self) -> &str {
        &self.target_url
    }

    /// Target endpoint parsed as a URI.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Replication direction, `None` when the engine default applies.
    pub fn replicator_type(&self) -> Option<ReplicatorType> {
        self.replicator_type
    }

    pub fn is_continuous(&self) -> bool {
        self.continuous
    }

    /// Opaque reference to the pinned server certificate, resolved through a
    /// [`CertificateSource`](crate::shared::CertificateSource).
    pub fn pinned_server_certificate(&self) -> Option<&str> {
        self.pinned_server_certificate.as_deref()
    }

    pub fn authenticator(&self) -> Option<&Authenticator> {
        self.authenticator.as_ref()
    }

    /// Document ids replication is restricted to, in request order.
    pub fn document_ids(&self) -> Option<&[String]> {
        self.document_ids.as_deref()
    }
}

/// Same as [`ReplicationConfig`] but without secrets. This type
/// implements [`Serialize`] because it does not contain secrets
/// so is safe to serialize.
///
/// Field names follow the request format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplicationConfigWithoutSecrets {
    pub database: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicator_type: Option<ReplicatorType>,
    #[serde(default)]
    pub continuous: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned_server_certificate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticator: Option<AuthenticatorWithoutSecrets>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_ids: Option<Vec<String>>,
}

impl From<ReplicationConfig> for ReplicationConfigWithoutSecrets {
    fn from(value: ReplicationConfig) -> Self {
        ReplicationConfigWithoutSecrets {
            database: value.database_name,
            target: value.target_url,
            replicator_type: value.replicator_type,
            continuous: value.continuous,
            pinned_server_certificate: value.pinned_server_certificate,
            authenticator: value.authenticator.map(Into::into),
            document_ids: value.document_ids,
        }
    }
}
