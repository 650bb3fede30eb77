//! Integration tests for configuration loading

use dbmsg_common::test_utils::create_temp_dir;
use dbmsg_common::{CacheDuration, DbMsgError};
use dbmsg_config::{Config, ConfigLoader};
use std::fs;
use std::time::Duration;

#[test]
fn test_full_file_with_every_section() {
    let dir = create_temp_dir();
    let path = dir.path().join("dbmsg.yaml");
    fs::write(
        &path,
        r#"
messages:
  basename: "app, errors"
  cache_duration: 2m
  fallback_to_default_locale: false
  default_locale: ""
  use_code_as_default_message: true
  encoding: ISO-8859-1
store:
  path: /var/lib/dbmsg
  tree: records
logging:
  level: "dbmsg_i18n=debug"
  pretty_format: true
"#,
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&path).unwrap();
    assert_eq!(config.messages.basenames(), vec!["app", "errors"]);
    assert_eq!(
        config.messages.cache_duration,
        CacheDuration::Ttl(Duration::from_secs(120))
    );
    assert!(config.messages.default_locale().is_none());
    assert!(config.messages.use_code_as_default_message);
    assert_eq!(config.store.tree, "records");
    assert!(config.logging.pretty_format);
    assert_eq!(config.logging.level, "dbmsg_i18n=debug");
}

#[test]
fn test_partial_file_keeps_defaults() {
    let dir = create_temp_dir();
    let path = dir.path().join("dbmsg.yml");
    fs::write(&path, "messages:\n  cache_duration: -1\n").unwrap();

    let config = ConfigLoader::load_from_file(&path).unwrap();
    let defaults = Config::default();
    assert_eq!(config.messages.cache_duration, CacheDuration::Forever);
    assert_eq!(config.messages.basename, defaults.messages.basename);
    assert_eq!(config.store, defaults.store);
}

#[test]
fn test_invalid_file_converts_to_config_error() {
    let dir = create_temp_dir();
    let path = dir.path().join("dbmsg.yaml");
    fs::write(&path, "messages:\n  basename: \" , \"\n").unwrap();

    let err = ConfigLoader::load_from_file(&path).unwrap_err();
    assert!(matches!(err, DbMsgError::Config { .. }));
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = create_temp_dir();
    assert!(ConfigLoader::load_from_file(dir.path().join("absent.yaml")).is_err());
}
