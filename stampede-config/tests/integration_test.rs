//! Integration tests for stampede-config

use stampede_config::*;
use std::io::Write;
use temp_env::with_vars;
use tempfile::NamedTempFile;

fn file_with(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_default_config_validation() {
    let config = StampedeConfig::default();
    assert!(config.validate_all().is_ok());
}

#[test]
fn test_config_loader_from_env() {
    let vars = vec![
        ("STAMPEDE_LOG_LEVEL", Some("debug")),
        ("STAMPEDE_LOG_FORMAT", Some("json")),
        ("STAMPEDE_SERVER_BIND_ADDRESS", Some("0.0.0.0")),
        ("STAMPEDE_SERVER_PORT", Some("9090")),
    ];

    with_vars(vars, || {
        let config = ConfigLoader::new().from_env().unwrap();

        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.server.socket_address(), "0.0.0.0:9090");
    });
}

#[test]
fn test_invalid_env_value_is_reported() {
    with_vars(vec![("STAMPEDE_SERVER_PORT", Some("not-a-port"))], || {
        let err = ConfigLoader::new().from_env().unwrap_err();
        assert!(matches!(err, ConfigError::EnvError(_)));
        assert!(err.to_string().contains("SERVER_PORT"));
    });
}

#[test]
fn test_custom_prefix() {
    with_vars(vec![("LOADTEST_LOG_LEVEL", Some("trace"))], || {
        let config = ConfigLoader::with_prefix("LOADTEST").from_env().unwrap();
        assert_eq!(config.logging.level, LogLevel::Trace);
    });
}

#[test]
fn test_yaml_file_with_env_override() {
    let file = file_with(
        ".yaml",
        r#"
logging:
  level: warn
  format: compact
server:
  bind_address: "0.0.0.0"
  port: 7000
  api_prefix: "/load"
"#,
    );

    with_vars(vec![("STAMPEDE_SERVER_PORT", Some("7001"))], || {
        let config = ConfigLoader::new().load(Some(file.path())).unwrap();

        assert_eq!(config.logging.level, LogLevel::Warn);
        assert_eq!(config.logging.format, LogFormat::Compact);
        assert_eq!(config.server.port, 7001);
        assert_eq!(config.server.api_prefix, "/load");
    });
}

#[test]
fn test_invalid_server_file_is_rejected() {
    let file = file_with(".yaml", "server:\n  api_prefix: \"load\"\n");

    with_vars(vec![("STAMPEDE_SERVER_PORT", None::<&str>)], || {
        let err = ConfigLoader::new().from_file(file.path()).unwrap_err();
        assert_eq!(err.violations(), ["api_prefix must start with '/', got 'load'"]);
    });
}

#[test]
fn test_missing_file_is_a_read_error() {
    let err = ConfigLoader::new()
        .from_file("/definitely/not/here.yaml")
        .unwrap_err();
    assert!(matches!(err, ConfigError::FileReadError(_)));
}

#[test]
fn test_load_json_submission() {
    let file = file_with(
        ".json",
        r#"{
            "data_source": {
                "kind": "memory",
                "collection_name": "stores",
                "max_pool_size": 4,
                "socket_timeout_secs": 5
            },
            "stage": {
                "worker_count": 2,
                "workers_to_add": 1,
                "increment_load": 2,
                "producer_count": 1,
                "msg_per_sec": 10,
                "sleep_secs": 1,
                "finish_secs": 2,
                "query_timeout_ms": 200,
                "collection_size": 10,
                "document_size_kb": 1
            }
        }"#,
    );

    let submission = ConfigLoader::new().load_submission(file.path()).unwrap();
    assert_eq!(submission.data_source.kind, DataSourceKind::Memory);
    assert_eq!(submission.stage.final_worker_count(), 4);
}

#[test]
fn test_yaml_submission_with_missing_fields() {
    let file = file_with(
        ".yml",
        r#"
db_config:
  conn_string: "sqlite://load.db"
  collection_name: stores
  max_pool_size: 2
  socket_timeout: 3
stage_config:
  workers_count: 1
"#,
    );

    let err = ConfigLoader::new().load_submission(file.path()).unwrap_err();
    assert_eq!(
        err.violations(),
        [
            "query_timeout_ms is required",
            "workers_to_add is required",
            "increment_load is required",
            "msg_per_sec is required",
            "producer_count is required",
            "sleep_secs is required",
            "finish_secs is required",
        ]
    );
    assert!(err.to_string().starts_with("Invalid submission configuration"));
}

#[test]
fn test_malformed_json_submission() {
    let file = file_with(".json", "{ not json");
    let err = ConfigLoader::new().load_submission(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::JsonError(_)));
}
