//! Loading configuration from disk and from the environment.

use std::io::Write;

use herald_center::{load_config, ConfigError, MissingNamePolicy};

#[test]
fn load_config_file_env_and_errors() {
    // Single test: it mutates process environment variables.
    let mut file = tempfile::NamedTempFile::new().expect("should create temp file");
    writeln!(
        file,
        r#"
[center]
missing_name = "reject"

[soak]
runs = 12
observers = 4

[logging]
level = "debug"
"#
    )
    .expect("should write config");

    let path = file.path().to_str().expect("temp path should be utf-8");
    let config = load_config(Some(path)).expect("config should load");
    assert_eq!(config.center.missing_name, MissingNamePolicy::Reject);
    assert_eq!(config.soak.runs, 12);
    assert_eq!(config.soak.observers, 4);
    assert_eq!(config.logging.level, "debug");

    let missing = load_config(Some("/definitely/not/here/herald.toml")).expect("missing file falls back");
    assert_eq!(missing.center.missing_name, MissingNamePolicy::Ignore);

    let mut broken = tempfile::NamedTempFile::new().expect("should create temp file");
    writeln!(broken, "[soak]\nruns = \"many\"").expect("should write config");
    let err = load_config(broken.path().to_str()).expect_err("bad value should fail");
    assert!(matches!(err, ConfigError::Parse(_)));

    std::env::set_var("HERALD_MISSING_NAME", "ignore");
    std::env::set_var("HERALD_SOAK_RUNS", "3");
    std::env::set_var("HERALD_SOAK_SEED", "99");
    std::env::set_var("HERALD_LOG_JSON", "1");
    let overridden = load_config(Some(path)).expect("config should load");
    std::env::remove_var("HERALD_MISSING_NAME");
    std::env::remove_var("HERALD_SOAK_RUNS");
    std::env::remove_var("HERALD_SOAK_SEED");
    std::env::remove_var("HERALD_LOG_JSON");

    assert_eq!(overridden.center.missing_name, MissingNamePolicy::Ignore);
    assert_eq!(overridden.soak.runs, 3);
    assert_eq!(overridden.soak.seed, Some(99));
    assert!(overridden.logging.json);
}
