// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use tempfile::TempDir;
use yare::parameterized;

fn write_config(temp: &TempDir, content: &str) -> PathBuf {
    let path = temp.path().join(DEFAULT_CONFIG_FILE);
    fs::write(&path, content).unwrap();
    path
}

fn remote(url: &str) -> RemoteConfig {
    RemoteConfig {
        url: url.to_string(),
        access_key: "key".to_string(),
        secret: "secret".to_string(),
    }
}

#[test]
fn test_missing_file_yields_defaults() {
    let temp = TempDir::new().unwrap();

    let config = Config::load(&temp.path().join("absent.toml")).unwrap();

    assert_eq!(config, Config::default());
    assert_eq!(config.database, "evsync.db");
    assert!(!config.is_remote_mode());
    assert_eq!(config.dispatcher_config(), DispatcherConfig::default());
}

#[test]
fn test_load_full_config() {
    let temp = TempDir::new().unwrap();
    let path = write_config(
        &temp,
        r#"
database = "data/runs.db"

[remote]
url = "wss://collector.example/v1"
access_key = "ak"
secret = "sk"

[dispatch]
poll_period_ms = 250
backoff_min_ms = 100
backoff_max_ms = 1000
response_timeout_ms = 2000
"#,
    );

    let config = Config::load(&path).unwrap();

    assert_eq!(config.database, "data/runs.db");
    assert_eq!(
        config.endpoint(),
        Some(Endpoint {
            url: "wss://collector.example/v1".into(),
            access_key: "ak".into(),
            secret: "sk".into(),
        })
    );
    let dispatcher = config.dispatcher_config();
    assert_eq!(dispatcher.period, Duration::from_millis(250));
    assert_eq!(dispatcher.backoff_min, Duration::from_millis(100));
    assert_eq!(dispatcher.backoff_max, Duration::from_millis(1000));
    assert_eq!(dispatcher.response_timeout, Duration::from_millis(2000));
}

#[test]
fn test_partial_dispatch_table_keeps_defaults() {
    let temp = TempDir::new().unwrap();
    let path = write_config(&temp, "[dispatch]\npoll_period_ms = 100\n");

    let config = Config::load(&path).unwrap();

    assert_eq!(config.dispatch.poll_period_ms, 100);
    assert_eq!(config.dispatch.backoff_max_ms, 300_000);
    assert!(config.remote.is_none());
}

#[test]
fn test_remote_without_credentials() {
    let temp = TempDir::new().unwrap();
    let path = write_config(&temp, "[remote]\nurl = \"ws://localhost:7890\"\n");

    let config = Config::load(&path).unwrap();

    let endpoint = config.endpoint().unwrap();
    assert!(endpoint.access_key.is_empty());
    assert!(endpoint.secret.is_empty());
}

#[test]
fn test_malformed_file_is_config_error() {
    let temp = TempDir::new().unwrap();
    let path = write_config(&temp, "database = [");

    let err = Config::load(&path).unwrap_err();

    assert!(matches!(err, Error::Config(_)));
    assert!(err.to_string().contains("failed to parse config"));
}

#[test]
fn test_save_and_load_round_trip() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(DEFAULT_CONFIG_FILE);
    let config = Config {
        remote: Some(remote("ws://localhost:7890")),
        ..Config::default()
    };

    config.save(&path).unwrap();

    assert_eq!(Config::load(&path).unwrap(), config);
}

#[parameterized(
    ws = { "ws://localhost:7890" },
    wss = { "wss://collector.example/v1" },
)]
fn test_validate_accepts_websocket_urls(url: &str) {
    let config = Config {
        remote: Some(remote(url)),
        ..Config::default()
    };
    assert!(config.validate().is_ok());
}

#[parameterized(
    http = { "http://collector.example" },
    bare = { "collector.example:7890" },
    empty = { "" },
)]
fn test_validate_rejects_other_urls(url: &str) {
    let config = Config {
        remote: Some(remote(url)),
        ..Config::default()
    };
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("must be ws:// or wss://"));
}

#[parameterized(
    zero_period = { 0, 1_000, 300_000, 30_000, "poll_period_ms" },
    zero_backoff = { 5_000, 0, 300_000, 30_000, "backoff_min_ms" },
    zero_timeout = { 5_000, 1_000, 300_000, 0, "response_timeout_ms" },
    inverted_backoff = { 5_000, 2_000, 1_000, 30_000, "exceeds backoff_max_ms" },
)]
fn test_validate_rejects_bad_timings(
    poll_period_ms: u64,
    backoff_min_ms: u64,
    backoff_max_ms: u64,
    response_timeout_ms: u64,
    expected: &str,
) {
    let config = Config {
        dispatch: DispatchConfig {
            poll_period_ms,
            backoff_min_ms,
            backoff_max_ms,
            response_timeout_ms,
        },
        ..Config::default()
    };
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains(expected), "got: {err}");
}

#[test]
fn test_url_override_enables_remote() {
    let mut config = Config::default();

    config.apply_overrides(&EnvOverrides {
        remote_url: Some("ws://override:1".into()),
        access_key: Some("ak".into()),
        secret: None,
    });

    let remote = config.remote.unwrap();
    assert_eq!(remote.url, "ws://override:1");
    assert_eq!(remote.access_key, "ak");
    assert_eq!(remote.secret, "");
}

#[test]
fn test_overrides_replace_file_values() {
    let mut config = Config {
        remote: Some(remote("ws://file:1")),
        ..Config::default()
    };

    config.apply_overrides(&EnvOverrides {
        remote_url: None,
        access_key: None,
        secret: Some("from-env".into()),
    });

    let remote = config.remote.unwrap();
    assert_eq!(remote.url, "ws://file:1");
    assert_eq!(remote.access_key, "key");
    assert_eq!(remote.secret, "from-env");
}

#[test]
fn test_credential_overrides_without_remote_are_ignored() {
    let mut config = Config::default();

    config.apply_overrides(&EnvOverrides {
        remote_url: None,
        access_key: Some("ak".into()),
        secret: Some("sk".into()),
    });

    assert!(config.remote.is_none());
}

#[test]
fn test_database_path_relative_to_config_dir() {
    let config = Config::default();

    let path = config.database_path(Path::new("/srv/evsync/evsync.toml"));

    assert_eq!(path, PathBuf::from("/srv/evsync/evsync.db"));
}

#[test]
fn test_database_path_bare_config_name() {
    let config = Config::default();

    assert_eq!(
        config.database_path(Path::new("evsync.toml")),
        PathBuf::from("evsync.db")
    );
}

#[test]
fn test_database_path_absolute() {
    let config = Config {
        database: "/var/lib/evsync.db".into(),
        ..Config::default()
    };

    assert_eq!(
        config.database_path(Path::new("/etc/evsync.toml")),
        PathBuf::from("/var/lib/evsync.db")
    );
}
