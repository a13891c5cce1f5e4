mod common;

use climate_sim::{ModelConfig, ModelConfigError};

#[test]
fn fixture_overrides_only_variance() {
    let config = ModelConfig::from_file(&common::fixture_path("test_model_config.json"))
        .expect("fixture parses");
    let builtin = ModelConfig::builtin();
    assert!(config.variance.enabled);
    assert_eq!(config.variance.seed, 1234);
    assert_eq!(config.emissions, builtin.emissions);
    assert_eq!(config.reforestation, builtin.reforestation);
    assert_eq!(config.policy, builtin.policy);
}

#[test]
fn invalid_fixture_is_rejected() {
    let err = ModelConfig::from_file(&common::fixture_path("invalid_model_config.json"))
        .expect_err("multiplier below 1.0");
    assert!(matches!(err, ModelConfigError::Invalid { .. }));
}

#[test]
fn malformed_json_is_a_parse_error() {
    let err = ModelConfig::from_json_str("{ \"emissions\": ").expect_err("truncated");
    assert!(matches!(err, ModelConfigError::Parse(_)));
}
