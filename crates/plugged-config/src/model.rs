// SPDX-FileCopyrightText: 2026 Plugged Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the plugged gateway.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use plugged_core::PluggedError;
use serde::{Deserialize, Serialize};

/// Top-level gateway configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PluggedConfig {
    /// Gateway identity.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Plugin catalog storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Plugin binary resolution settings.
    #[serde(default)]
    pub plugins: PluginsConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PluggedConfig {
    /// Home directory holding the catalog file.
    ///
    /// `gateway.home` wins; otherwise the user's home directory.
    pub fn home_dir(&self) -> Result<PathBuf, PluggedError> {
        match &self.gateway.home {
            Some(home) => Ok(PathBuf::from(home)),
            None => dirs::home_dir().ok_or_else(|| {
                PluggedError::Config(
                    "unable to determine home directory; set gateway.home".to_string(),
                )
            }),
        }
    }

    /// Location of the catalog: `storage.database_path` or `<home>/.<name>.db`.
    pub fn database_path(&self) -> Result<PathBuf, PluggedError> {
        if let Some(path) = &self.storage.database_path {
            return Ok(PathBuf::from(path));
        }
        Ok(self.home_dir()?.join(format!(".{}.db", self.gateway.name)))
    }
}

/// Gateway identity configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Application name; plugin binaries are named `<name>-<plugin>`.
    #[serde(default = "default_gateway_name")]
    pub name: String,

    /// One-line description shown in the help view.
    #[serde(default = "default_gateway_description")]
    pub description: String,

    /// Directory holding the catalog file. `None` uses the user's home directory.
    #[serde(default)]
    pub home: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            name: default_gateway_name(),
            description: default_gateway_description(),
            home: None,
        }
    }
}

fn default_gateway_name() -> String {
    "plugged".to_string()
}

fn default_gateway_description() -> String {
    "An extendable command-line gateway.".to_string()
}

/// Catalog storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Explicit path to the catalog file, overriding `<home>/.<name>.db`.
    #[serde(default)]
    pub database_path: Option<String>,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,

    /// How long to wait for another process holding the catalog lock.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl StorageConfig {
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            wal_mode: default_wal_mode(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

fn default_wal_mode() -> bool {
    true
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

/// Plugin binary resolution configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PluginsConfig {
    /// Search path used instead of `PATH` when locating plugin binaries.
    #[serde(default)]
    pub search_path: Option<String>,
}

impl PluginsConfig {
    /// The configured search path, falling back to the process `PATH`.
    pub fn effective_search_path(&self) -> Option<OsString> {
        match &self.search_path {
            Some(path) => Some(OsString::from(path)),
            None => std::env::var_os("PATH"),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
