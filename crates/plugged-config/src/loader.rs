// SPDX-FileCopyrightText: 2026 Plugged Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./plugged.toml` > `~/.config/plugged/plugged.toml` > `/etc/plugged/plugged.toml`
//! with environment variable overrides via `PLUGGED_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use tracing::debug;

use crate::model::PluggedConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/plugged/plugged.toml` (system-wide)
/// 3. `~/.config/plugged/plugged.toml` (user XDG config)
/// 4. `./plugged.toml` (local directory)
/// 5. `PLUGGED_*` environment variables
pub fn load_config() -> Result<PluggedConfig, figment::Error> {
    let config: PluggedConfig = build_figment().extract()?;
    debug!(gateway = %config.gateway.name, "configuration loaded");
    Ok(config)
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<PluggedConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PluggedConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PluggedConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PluggedConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(PluggedConfig::default()))
        .merge(Toml::file("/etc/plugged/plugged.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("plugged/plugged.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("plugged.toml"))
        .merge(env_provider())
}

/// Environment provider with explicit section-to-dot mapping.
///
/// `Env::split("_")` would turn `PLUGGED_STORAGE_BUSY_TIMEOUT_MS` into
/// `storage.busy.timeout.ms`; only the first segment names the section.
fn env_provider() -> Env {
    Env::prefixed("PLUGGED_").map(|key| map_env_key(key.as_str()).into())
}

/// Map a prefix-stripped env var name to its lowercase dotted config key.
pub(crate) fn map_env_key(key: &str) -> String {
    const SECTIONS: [&str; 4] = ["gateway", "storage", "plugins", "logging"];

    let key = key.to_ascii_lowercase();
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key
}
