use replication_config::shared::{
    Authenticator, ConfigError, ReplicationConfig, ReplicationConfigWithoutSecrets,
    ReplicatorType,
};
use secrecy::ExposeSecret;
use serde_json::{Value, json};

fn parse(value: Value) -> Result<ReplicationConfig, ConfigError> {
    ReplicationConfig::parse(&value).map(|config| config.expect("config should be present"))
}

fn base_config() -> serde_json::Map<String, Value> {
    match json!({ "database": "db1", "target": "wss://sync.example.com:4984/db1" }) {
        Value::Object(object) => object,
        _ => unreachable!(),
    }
}

fn request_with(extra: Value) -> Value {
    let mut config = base_config();
    if let Value::Object(extra) = extra {
        config.extend(extra);
    }
    json!({ "config": config })
}

#[test]
fn required_fields_are_copied_verbatim() {
    for target in [
        "wss://host/db",
        "ws://localhost:4984/my-db",
        "wss://HOST.example.com/Db?x=1",
    ] {
        let config = parse(json!({ "config": { "database": "Inventory DB", "target": target } }))
            .unwrap();

        assert_eq!(config.database_name(), "Inventory DB");
        assert_eq!(config.target_url(), target);
    }
}

#[test]
fn missing_database_is_reported_regardless_of_other_fields() {
    let requests = [
        json!({ "config": { "target": "wss://host/db" } }),
        json!({ "config": {} }),
        json!({ "config": {
            "replicatorType": "nope",
            "continuous": "nope",
            "authenticator": { "method": "nope" }
        } }),
    ];

    for request in requests {
        let err = parse(request).unwrap_err();
        assert!(
            matches!(err, ConfigError::MissingField("database")),
            "unexpected error: {err:?}"
        );
    }
}

#[test]
fn missing_target_is_reported_regardless_of_other_fields() {
    let requests = [
        json!({ "config": { "database": "db1" } }),
        json!({ "config": {
            "database": "db1",
            "replicatorType": "BOTH",
            "documentIds": ["a"]
        } }),
    ];

    for request in requests {
        let err = parse(request).unwrap_err();
        assert!(
            matches!(err, ConfigError::MissingField("target")),
            "unexpected error: {err:?}"
        );
    }
}

#[test]
fn example_request_maps_to_expected_config() {
    let config = ReplicationConfig::parse_str(
        r#"{"config":{"database":"db1","target":"wss://host/db","continuous":true}}"#,
    )
    .unwrap()
    .unwrap();

    assert_eq!(config.database_name(), "db1");
    assert_eq!(config.target_url(), "wss://host/db");
    assert!(config.is_continuous());
    assert_eq!(config.replicator_type(), None);
}

#[test]
fn full_request_maps_every_field() {
    let config = parse(request_with(json!({
        "replicatorType": "PUSH_AND_PULL",
        "continuous": false,
        "pinnedServerCertificate": "certs/sync-gateway.cer",
        "authenticator": { "method": "basic", "username": "alice", "password": "s3cret" },
        "documentIds": ["a", "b", "c"]
    })))
    .unwrap();

    assert_eq!(config.replicator_type(), Some(ReplicatorType::PushAndPull));
    assert!(!config.is_continuous());
    assert_eq!(
        config.pinned_server_certificate(),
        Some("certs/sync-gateway.cer")
    );
    assert_eq!(
        config.document_ids().map(<[String]>::to_vec),
        Some(vec!["a".to_owned(), "b".to_owned(), "c".to_owned()])
    );

    match config.authenticator() {
        Some(Authenticator::Basic { username, password }) => {
            assert_eq!(username, "alice");
            assert_eq!(password.expose_secret().as_str(), "s3cret");
        }
        other => panic!("expected basic authenticator, got {other:?}"),
    }
}

#[test]
fn session_authenticator_without_cookie_name() {
    let config = parse(request_with(json!({
        "authenticator": { "method": "session", "sessionId": "904ac010862f37c8dd99015a33ab5a3565fd8447" }
    })))
    .unwrap();

    match config.authenticator() {
        Some(Authenticator::Session {
            session_id,
            cookie_name,
        }) => {
            assert_eq!(
                session_id.expose_secret().as_str(),
                "904ac010862f37c8dd99015a33ab5a3565fd8447"
            );
            assert!(cookie_name.is_none());
        }
        other => panic!("expected session authenticator, got {other:?}"),
    }
}

#[test]
fn pinned_certificate_must_be_a_string() {
    let err = parse(request_with(json!({ "pinnedServerCertificate": ["cert"] }))).unwrap_err();

    assert!(matches!(
        err,
        ConfigError::TypeMismatch {
            field: "pinnedServerCertificate",
            expected: "string"
        }
    ));
}

#[test]
fn error_messages_name_the_offending_field() {
    let err = parse(json!({ "config": { "database": "db1" } })).unwrap_err();
    assert_eq!(err.to_string(), "Missing required field `target`");

    let err = parse(request_with(json!({ "replicatorType": "BOTH" }))).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid value `BOTH` for field `replicatorType`"
    );

    let err = parse(request_with(json!({ "continuous": 1 }))).unwrap_err();
    assert_eq!(err.to_string(), "Field `continuous` must be a boolean");
}

#[test]
fn debug_output_does_not_leak_secrets() {
    let config = parse(request_with(json!({
        "authenticator": { "method": "basic", "username": "alice", "password": "hunter2" }
    })))
    .unwrap();

    let debug = format!("{config:?}");
    assert!(debug.contains("alice"));
    assert!(!debug.contains("hunter2"));

    let summary = serde_json::to_string(&ReplicationConfigWithoutSecrets::from(config)).unwrap();
    assert!(!summary.contains("hunter2"));
    assert!(!summary.contains("password"));
}

#[test]
fn without_secrets_round_trips_through_json() {
    let config = parse(request_with(json!({
        "replicatorType": "PUSH",
        "authenticator": { "method": "session", "sessionId": "abc", "cookieName": "SGSession" }
    })))
    .unwrap();

    let summary = ReplicationConfigWithoutSecrets::from(config);
    let decoded: ReplicationConfigWithoutSecrets =
        serde_json::from_str(&serde_json::to_string(&summary).unwrap()).unwrap();

    assert_eq!(decoded, summary);
}
