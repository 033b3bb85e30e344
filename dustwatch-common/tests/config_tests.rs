use dustwatch_common::config::{default_config_path, ensure_config_exists, EngineConfig};
use dustwatch_common::error::{DustwatchError, ErrorCategory};
use dustwatch_common::logging::LogLevel;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_default_values() {
    let config = EngineConfig::default();

    assert_eq!(config.classification.dust_threshold, 546);
    assert_eq!(config.classification.large_threshold, 10_000);
    assert_eq!(config.classification.change_like_ceiling(), 1_092);
    assert_eq!(config.classification.security_min_value, 1_000);
    assert_eq!(config.classification.privacy_min_value, 546);

    assert_eq!(config.scoring.dust_attack_count, 5);
    assert_eq!(config.scoring.dust_pattern_count, 3);
    assert_eq!(config.scoring.systematic_dust_count, 5);
    assert_eq!(config.scoring.default_privacy_score, 50);
    assert_eq!(config.scoring.round_denominations, vec![10_000, 50_000, 100_000]);
    assert_eq!(config.scoring.address_concentration_count, 50);

    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_file_uses_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[classification]
dust_threshold = 1000

[scoring]
unconfirmed_count = 3

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let config = EngineConfig::load(&path).unwrap();

    assert_eq!(config.classification.dust_threshold, 1_000);
    assert_eq!(config.classification.large_threshold, 10_000);
    assert_eq!(config.scoring.unconfirmed_count, 3);
    assert_eq!(config.scoring.dust_attack_count, 5);
    assert_eq!(config.logging.level, LogLevel::Debug);
}

#[test]
fn test_save_and_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");

    let mut config = EngineConfig::default();
    config.classification.security_min_value = 2_500;
    config.scoring.low_privacy_threshold = 35.0;
    config.save(&path).unwrap();

    let loaded = EngineConfig::load(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_validation_rejects_bad_thresholds() {
    let mut config = EngineConfig::default();
    config.classification.dust_threshold = 20_000;
    assert!(config.validate().is_err());

    let mut config = EngineConfig::default();
    config.scoring.dust_pattern_count = 6;
    assert!(config.validate().is_err());

    let mut config = EngineConfig::default();
    config.scoring.systematic_dust_count = 0;
    assert!(config.validate().is_err());

    let mut config = EngineConfig::default();
    config.scoring.low_privacy_threshold = 140.0;
    assert!(config.validate().is_err());

    let mut config = EngineConfig::default();
    config.scoring.round_denominations = vec![10_000, 0];
    assert!(config.validate().is_err());
}

#[test]
fn test_validation_rejects_unbalanced_weights() {
    let mut config = EngineConfig::default();
    config.scoring.weights.privacy = 0.9;

    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("sum to 1.0"));
}

#[test]
fn test_load_rejects_invalid_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[classification]\nlarge_threshold = 100\n").unwrap();

    assert!(EngineConfig::load(&path).is_err());
    assert!(EngineConfig::load(dir.path().join("missing.toml")).is_err());
}

#[test]
fn test_load_failures_are_config_errors() {
    let dir = tempdir().unwrap();
    let bad_toml = dir.path().join("bad.toml");
    fs::write(&bad_toml, "[scoring\n").unwrap();
    let bad_values = dir.path().join("values.toml");
    fs::write(&bad_values, "[classification]\nlarge_threshold = 100\n").unwrap();

    for path in [bad_toml, bad_values, dir.path().join("missing.toml")] {
        let err = EngineConfig::load(&path).unwrap_err();
        let err = err
            .downcast_ref::<DustwatchError>()
            .expect("config failures carry a DustwatchError");
        assert_eq!(err.category(), ErrorCategory::Config);
    }
}

#[test]
fn test_default_config_path_is_per_application() {
    let path = default_config_path();

    assert!(path.ends_with("dustwatch/config.toml"));
}

#[test]
fn test_ensure_config_exists_creates_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("dustwatch").join("config.toml");

    ensure_config_exists(&path).unwrap();
    assert!(path.exists());
    assert_eq!(EngineConfig::load(&path).unwrap(), EngineConfig::default());

    // An existing file is left alone
    fs::write(&path, "[scoring]\nunconfirmed_count = 7\n").unwrap();
    ensure_config_exists(&path).unwrap();
    assert_eq!(EngineConfig::load(&path).unwrap().scoring.unconfirmed_count, 7);
}
