//! Unit tests for config.rs module

use std::collections::HashMap;
use std::io::Write;

use studio_booking::config::{AppConfig, StorageBackend};

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_default_server_and_storage() {
    let config = AppConfig::default();

    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 5000);
    assert_eq!(config.storage.backend, StorageBackend::Sqlite);
    assert_eq!(config.storage.max_connections, 8);
    assert_eq!(config.storage.connection_timeout_secs, 5);
    assert_eq!(config.bind_address(), "0.0.0.0:5000");
}

#[test]
fn test_default_has_no_secrets() {
    let config = AppConfig::default();
    assert!(config.admin.token.is_none());
}

#[test]
fn test_default_business_info() {
    let config = AppConfig::default();
    assert_eq!(config.business.name, "Dr. Anand's Fitness Art");
    assert_eq!(config.business.tagline, "Fitness, Nutrition & Healing");
}

#[test]
fn test_overrides_apply_conventional_variables() {
    let mut config = AppConfig::default();
    config
        .apply_overrides(lookup(&[
            ("DATABASE_URL", "sqlite:/tmp/other.db"),
            ("PORT", "8081"),
            ("ADMIN_TOKEN", "s3cret"),
        ]))
        .unwrap();

    assert_eq!(config.storage.database_url, "sqlite:/tmp/other.db");
    assert_eq!(config.server.port, 8081);
    assert_eq!(config.admin.token.as_deref(), Some("s3cret"));
    assert!(config.validate().is_ok());
}

#[test]
fn test_overrides_reject_bad_port() {
    let mut config = AppConfig::default();
    assert!(config.apply_overrides(lookup(&[("PORT", "eighty")])).is_err());
}

#[test]
fn test_overrides_absent_leave_config_untouched() {
    let mut config = AppConfig::default();
    config.apply_overrides(lookup(&[])).unwrap();
    assert_eq!(config.server.port, 5000);
    assert!(config.admin.token.is_none());
}

#[test]
fn test_validate_rejects_port_zero() {
    let mut config = AppConfig::default();
    config.server.port = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_non_sqlite_url() {
    let mut config = AppConfig::default();
    config.storage.database_url = "mongodb://localhost/studio".to_string();
    assert!(config.validate().is_err());

    // The URL is irrelevant when only memory is used
    config.storage.backend = StorageBackend::Memory;
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_rejects_zero_timeout() {
    let mut config = AppConfig::default();
    config.storage.connection_timeout_secs = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_unknown_log_level() {
    let mut config = AppConfig::default();
    config.logging.level = "verbose".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_unknown_log_format() {
    let mut config = AppConfig::default();
    config.logging.format = "xml".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_blank_admin_token() {
    let mut config = AppConfig::default();
    config.admin.token = Some("   ".to_string());
    assert!(config.validate().is_err());
}

#[test]
fn test_load_reads_explicit_file() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        r#"
[server]
port = 7070

[storage]
backend = "memory"

[business]
name = "Test Studio"
"#
    )
    .unwrap();

    let config = AppConfig::load(Some(file.path())).unwrap();

    // PORT may be set in the environment running the tests
    if std::env::var("PORT").is_err() && std::env::var("STUDIO_SERVER__PORT").is_err() {
        assert_eq!(config.server.port, 7070);
    }
    assert_eq!(config.storage.backend, StorageBackend::Memory);
    assert_eq!(config.business.name, "Test Studio");
    // Unset keys keep their defaults
    assert_eq!(config.business.tagline, "Fitness, Nutrition & Healing");
}

#[test]
fn test_load_missing_explicit_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    assert!(AppConfig::load(Some(&missing)).is_err());
}

#[test]
fn test_storage_options() {
    let config = AppConfig::default();
    let options = config.storage.db_options();
    assert_eq!(options.max_connections, 8);
    assert_eq!(options.connection_timeout.as_secs(), 5);
}
