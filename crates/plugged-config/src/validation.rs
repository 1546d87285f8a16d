// SPDX-FileCopyrightText: 2026 Plugged Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as a gateway name usable in binary names and a known log level.

use crate::diagnostic::ConfigError;
use crate::model::PluggedConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &PluggedConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let name = config.gateway.name.trim();
    if name.is_empty() {
        errors.push(ConfigError::Validation {
            message: "gateway.name must not be empty".to_string(),
        });
    } else if name.contains(std::path::is_separator) {
        errors.push(ConfigError::Validation {
            message: format!("gateway.name `{name}` must not contain path separators"),
        });
    }

    if let Some(home) = &config.gateway.home
        && home.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "gateway.home must not be empty when set".to_string(),
        });
    }

    if let Some(path) = &config.storage.database_path
        && path.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty when set".to_string(),
        });
    }

    if config.storage.busy_timeout_ms == 0 {
        errors.push(ConfigError::Validation {
            message: "storage.busy_timeout_ms must be greater than 0".to_string(),
        });
    }

    let level = config.logging.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "logging.log_level `{}` must be one of: {}",
                config.logging.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
