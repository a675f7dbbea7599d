use std::str::FromStr;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::shared::fields::FieldReader;
use crate::shared::{ConfigError, ConfigResult};

const METHOD_FIELD: &str = "method";
const USERNAME_FIELD: &str = "username";
const PASSWORD_FIELD: &str = "password";
const SESSION_ID_FIELD: &str = "sessionId";
const COOKIE_NAME_FIELD: &str = "cookieName";

const BASIC_METHOD: &str = "basic";
const SESSION_METHOD: &str = "session";

/// Authentication methods accepted in the `method` field of an authenticator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthenticatorMethod {
    /// HTTP basic authentication.
    Basic,
    /// Sync Gateway session cookie.
    Session,
}

impl AuthenticatorMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthenticatorMethod::Basic => BASIC_METHOD,
            AuthenticatorMethod::Session => SESSION_METHOD,
        }
    }
}

impl FromStr for AuthenticatorMethod {
    type Err = ConfigError;

    /// Parses the method tag. Matching is case-sensitive.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            BASIC_METHOD => Ok(Self::Basic),
            SESSION_METHOD => Ok(Self::Session),
            other => Err(ConfigError::InvalidEnumValue {
                field: METHOD_FIELD,
                value: other.to_owned(),
            }),
        }
    }
}

/// Credentials the replication engine presents to the remote endpoint.
///
/// This intentionally does not implement [`Serialize`] to avoid accidentally
/// leaking secrets into serialized forms.
#[derive(Debug, Clone)]
pub enum Authenticator {
    /// Username and password sent with every request.
    Basic {
        username: String,
        password: SecretString,
    },
    /// Previously established session.
    ///
    /// When `cookie_name` is `None` the engine uses its default session cookie name.
    Session {
        session_id: SecretString,
        cookie_name: Option<String>,
    },
}

impl Authenticator {
    /// Maps a JSON authenticator object onto an [`Authenticator`].
    ///
    /// The object must carry a `method` of `basic` (with `username` and `password`) or
    /// `session` (with `sessionId` and an optional `cookieName`).
    pub fn parse(object: &Map<String, Value>) -> ConfigResult<Self> {
        let fields = FieldReader::new(object);
        let method: AuthenticatorMethod = fields.required_str(METHOD_FIELD)?.parse()?;

        match method {
            AuthenticatorMethod::Basic => {
                let username = fields.required_str(USERNAME_FIELD)?.to_owned();
                let password = fields.required_str(PASSWORD_FIELD)?.to_owned();

                Ok(Authenticator::Basic {
                    username,
                    password: SecretString::new(password),
                })
            }
            AuthenticatorMethod::Session => {
                let session_id = fields.required_str(SESSION_ID_FIELD)?.to_owned();
                let cookie_name = fields.optional_str(COOKIE_NAME_FIELD)?.map(str::to_owned);

                Ok(Authenticator::Session {
                    session_id: SecretString::new(session_id),
                    cookie_name,
                })
            }
        }
    }

    pub fn method(&self) -> AuthenticatorMethod {
        match self {
            Authenticator::Basic { .. } => AuthenticatorMethod::Basic,
            Authenticator::Session { .. } => AuthenticatorMethod::Session,
        }
    }
}

/// Same as [`Authenticator`] but without secrets. This type
/// implements [`Serialize`] because it does not contain secrets
/// so is safe to serialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum AuthenticatorWithoutSecrets {
    Basic {
        username: String,
    },
    #[serde(rename_all = "camelCase")]
    Session {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cookie_name: Option<String>,
    },
}

impl From<Authenticator> for AuthenticatorWithoutSecrets {
    fn from(value: Authenticator) -> Self {
        match value {
            Authenticator::Basic {
                username,
                password: _,
            } => AuthenticatorWithoutSecrets::Basic { username },
            Authenticator::Session {
                session_id: _,
                cookie_name,
            } => AuthenticatorWithoutSecrets::Session { cookie_name },
        }
    }
}
