// SPDX-FileCopyrightText: 2026 Plugged Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the plugged configuration system.

use plugged_config::diagnostic::ConfigError;
use plugged_config::model::PluggedConfig;
use plugged_config::{
    load_and_validate_str, load_config, load_config_from_path, load_config_from_str,
};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_plugged_config() {
    let toml = r#"
[gateway]
name = "demo"
description = "A demo gateway."
home = "/tmp/demo-home"

[storage]
database_path = "/tmp/demo.db"
wal_mode = false
busy_timeout_ms = 100

[plugins]
search_path = "/opt/demo/bin"

[logging]
log_level = "debug"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.gateway.name, "demo");
    assert_eq!(config.gateway.description, "A demo gateway.");
    assert_eq!(config.gateway.home.as_deref(), Some("/tmp/demo-home"));
    assert_eq!(config.storage.database_path.as_deref(), Some("/tmp/demo.db"));
    assert!(!config.storage.wal_mode);
    assert_eq!(config.storage.busy_timeout_ms, 100);
    assert_eq!(config.plugins.search_path.as_deref(), Some("/opt/demo/bin"));
    assert_eq!(config.logging.log_level, "debug");
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.gateway.name, "plugged");
    assert!(config.gateway.home.is_none());
    assert!(config.storage.database_path.is_none());
    assert!(config.storage.wal_mode);
    assert_eq!(config.storage.busy_timeout_ms, 5000);
    assert!(config.plugins.search_path.is_none());
    assert_eq!(config.logging.log_level, "warn");
}

/// Unknown field in [gateway] section is rejected.
#[test]
fn unknown_field_in_gateway_produces_error() {
    let err = load_config_from_str("[gateway]\nnaem = \"demo\"\n")
        .expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("naem"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Unknown top-level section is rejected.
#[test]
fn unknown_section_produces_error() {
    assert!(load_config_from_str("[telemetry]\nenabled = true\n").is_err());
}

/// Dotted overrides (as produced by the env provider) win over TOML.
#[test]
fn dotted_override_wins_over_toml() {
    use figment::{
        providers::{Format, Serialized, Toml},
        Figment,
    };

    let config: PluggedConfig = Figment::new()
        .merge(Serialized::defaults(PluggedConfig::default()))
        .merge(Toml::string("[gateway]\nname = \"from-toml\"\n"))
        .merge(("gateway.name", "from-env"))
        .merge(("storage.busy_timeout_ms", 42))
        .extract()
        .expect("should merge override");

    assert_eq!(config.gateway.name, "from-env");
    assert_eq!(config.storage.busy_timeout_ms, 42);
}

/// `PLUGGED_*` variables override defaults through the layered loader.
#[test]
fn env_vars_override_defaults() {
    figment::Jail::expect_with(|jail| {
        jail.set_env("PLUGGED_GATEWAY_NAME", "demo");
        jail.set_env("PLUGGED_STORAGE_BUSY_TIMEOUT_MS", "1234");
        jail.set_env("PLUGGED_PLUGINS_SEARCH_PATH", "/opt/demo/bin");

        let config = load_config()?;
        assert_eq!(config.gateway.name, "demo");
        assert_eq!(config.storage.busy_timeout_ms, 1234);
        assert_eq!(config.plugins.search_path.as_deref(), Some("/opt/demo/bin"));
        Ok(())
    });
}

/// Env vars win over `./plugged.toml`.
#[test]
fn env_vars_override_local_toml() {
    figment::Jail::expect_with(|jail| {
        jail.create_file("plugged.toml", "[gateway]\nname = \"from-toml\"\n")?;
        jail.set_env("PLUGGED_GATEWAY_NAME", "from-env");

        let config = load_config()?;
        assert_eq!(config.gateway.name, "from-env");
        Ok(())
    });
}

/// Missing config files are silently skipped.
#[test]
fn missing_config_file_is_silently_skipped() {
    let config = load_config_from_path(std::path::Path::new("/nonexistent/plugged.toml"))
        .expect("missing file should be silently skipped");
    assert!(config.storage.busy_timeout_ms > 0);
}

/// Validation runs after deserialization and reports every problem.
#[test]
fn load_and_validate_reports_validation_errors() {
    let toml = r#"
[gateway]
name = ""

[logging]
log_level = "chatty"
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert_eq!(errors.len(), 2);
    assert!(errors
        .iter()
        .all(|e| matches!(e, ConfigError::Validation { .. })));
}

/// Type mismatches surface as InvalidType diagnostics.
#[test]
fn wrong_type_becomes_invalid_type_diagnostic() {
    let errors = load_and_validate_str("[storage]\nwal_mode = \"yes\"\n")
        .expect_err("should reject wrong type");
    assert!(errors.iter().any(
        |e| matches!(e, ConfigError::InvalidType { key, .. } if key.contains("wal_mode"))
    ));
}

/// Unknown keys in inline sources carry a suggestion and a source span.
#[test]
fn unknown_key_diagnostic_suggests_correction() {
    let errors = load_and_validate_str("[storage]\nwal_mod = true\n")
        .expect_err("should reject unknown key");
    match &errors[0] {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => {
            assert_eq!(key, "wal_mod");
            assert_eq!(suggestion.as_deref(), Some("wal_mode"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}
