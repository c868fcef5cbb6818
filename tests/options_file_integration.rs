//! Integration tests for loading options files.

use std::io::Write;
use std::time::Duration;

use chconf::options::{OptionsFile, SettingValue};
use chconf::prelude::*;
use pretty_assertions::assert_eq;

/// Test loading a complete options file from disk
#[test]
fn test_load_full_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(
        file,
        r#"
        dsn = "clickhouse://ingest:pw@ch1:9000,ch2:9000/events?compress=true&async_insert=1"

        [pool]
        max_idle_conns = 8
        conn_max_lifetime = "15m"
        dial_timeout = "500ms"

        [settings]
        wait_for_async_insert = false
        "#
    )
    .expect("write file");

    let options = load_options(file.path()).expect("valid options file");

    assert_eq!(options.addr, vec!["ch1:9000", "ch2:9000"]);
    assert_eq!(options.auth.database, "events");
    assert_eq!(options.auth.username, "ingest");
    assert_eq!(options.compression_method(), Some(CompressionMethod::Lz4));
    assert_eq!(options.max_idle_conns, 8);
    assert_eq!(options.max_open_conns, 13);
    assert_eq!(options.conn_max_lifetime, Duration::from_secs(900));
    assert_eq!(options.dial_timeout, Duration::from_millis(500));
    assert_eq!(options.settings["async_insert"], SettingValue::Int(1));
    assert_eq!(
        options.settings["wait_for_async_insert"],
        SettingValue::Bool(false)
    );
}

/// Test that file settings win over DSN settings of the same name
#[test]
fn test_file_settings_override_dsn() {
    let file: OptionsFile = r#"
        dsn = "clickhouse://localhost?max_threads=2"
        [settings]
        max_threads = 16
    "#
    .parse()
    .expect("valid options file");

    let options = file.to_options().expect("valid DSN");
    assert_eq!(options.settings["max_threads"], SettingValue::Int(16));
    assert_eq!(options.settings.len(), 1);
}

/// Test that DSN errors surface unchanged through the file loader
#[test]
fn test_file_with_bad_dsn() {
    let file: OptionsFile = r#"dsn = "clickhouse://localhost?read_timeout=soon""#
        .parse()
        .expect("valid TOML");

    let err = file.to_options().expect_err("bad duration");
    assert!(err.is_malformed_dsn());
}

/// Test that a missing dsn key is a parse error
#[test]
fn test_file_without_dsn() {
    let result: OptionsResult<OptionsFile> = "[pool]\nmax_open_conns = 3\n".parse();
    assert!(matches!(result, Err(OptionsError::Toml { .. })));
}
