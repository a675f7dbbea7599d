use serde_json::{Map, Value};
use tracing::warn;

use crate::shared::{ConfigError, ConfigResult};

/// Expected type names reported through [`ConfigError::TypeMismatch`].
const STRING_TYPE: &str = "string";
const BOOLEAN_TYPE: &str = "boolean";

/// Typed accessors over a JSON object.
///
/// An explicit `null` is treated the same as a missing key.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FieldReader<'a> {
    object: &'a Map<String, Value>,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(object: &'a Map<String, Value>) -> Self {
        Self { object }
    }

    fn get(&self, field: &str) -> Option<&'a Value> {
        self.object.get(field).filter(|value| !value.is_null())
    }

    pub(crate) fn required_str(&self, field: &'static str) -> ConfigResult<&'a str> {
        self.optional_str(field)?
            .ok_or(ConfigError::MissingField(field))
    }

    pub(crate) fn optional_str(&self, field: &'static str) -> ConfigResult<Option<&'a str>> {
        match self.get(field) {
            None => Ok(None),
            Some(Value::String(value)) => Ok(Some(value.as_str())),
            Some(_) => Err(ConfigError::TypeMismatch {
                field,
                expected: STRING_TYPE,
            }),
        }
    }

    pub(crate) fn optional_bool(&self, field: &'static str) -> ConfigResult<Option<bool>> {
        match self.get(field) {
            None => Ok(None),
            Some(Value::Bool(value)) => Ok(Some(*value)),
            Some(_) => Err(ConfigError::TypeMismatch {
                field,
                expected: BOOLEAN_TYPE,
            }),
        }
    }

    /// Returns the nested object under `field`, ignoring values of any other type.
    pub(crate) fn lenient_object(&self, field: &'static str) -> Option<&'a Map<String, Value>> {
        match self.get(field)? {
            Value::Object(object) => Some(object),
            other => {
                warn!(
                    field,
                    found = json_kind(other),
                    "ignoring field that is not an object"
                );
                None
            }
        }
    }

    /// Returns the array under `field`, ignoring values of any other type.
    pub(crate) fn lenient_array(&self, field: &'static str) -> Option<&'a [Value]> {
        match self.get(field)? {
            Value::Array(values) => Some(values.as_slice()),
            other => {
                warn!(
                    field,
                    found = json_kind(other),
                    "ignoring field that is not a list"
                );
                None
            }
        }
    }
}

/// Renders a JSON value as a plain string.
///
/// Strings are taken verbatim, everything else uses its compact JSON form.
pub(crate) fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(value) => value.clone(),
        other => other.to_string(),
    }
}

/// Returns the JSON type name of `value` for diagnostics.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => BOOLEAN_TYPE,
        Value::Number(_) => "number",
        Value::String(_) => STRING_TYPE,
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(object) => object,
            other => panic!("expected an object, got {other}"),
        }
    }

    #[test]
    fn test_null_is_treated_as_missing() {
        let object = object(json!({ "database": null }));
        let fields = FieldReader::new(&object);

        assert!(matches!(
            fields.required_str("database"),
            Err(ConfigError::MissingField("database"))
        ));
        assert!(fields.optional_bool("database").unwrap().is_none());
    }

    #[test]
    fn test_wrong_type_is_a_mismatch() {
        let object = object(json!({ "database": 42, "continuous": "yes" }));
        let fields = FieldReader::new(&object);

        assert!(matches!(
            fields.required_str("database"),
            Err(ConfigError::TypeMismatch {
                field: "database",
                expected: "string"
            })
        ));
        assert!(matches!(
            fields.optional_bool("continuous"),
            Err(ConfigError::TypeMismatch {
                field: "continuous",
                expected: "boolean"
            })
        ));
    }

    #[test]
    fn test_lenient_accessors_skip_other_types() {
        let object = object(json!({ "authenticator": "basic", "documentIds": { "a": 1 } }));
        let fields = FieldReader::new(&object);

        assert!(fields.lenient_object("authenticator").is_none());
        assert!(fields.lenient_array("documentIds").is_none());
        assert!(fields.lenient_array("missing").is_none());
    }

    #[test]
    fn test_value_to_string() {
        assert_eq!(value_to_string(&json!("doc-1")), "doc-1");
        assert_eq!(value_to_string(&json!(17)), "17");
        assert_eq!(value_to_string(&json!(true)), "true");
        assert_eq!(value_to_string(&json!(["a"])), "[\"a\"]");
    }
}
