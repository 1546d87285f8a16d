// SPDX-FileCopyrightText: 2026 Plugged Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin record and its storage codec.
//!
//! Records are stored as JSON objects with the field names `Name`,
//! `Description` and `AppName`, keyed by the plugin name.

use serde::{Deserialize, Serialize};

use crate::error::PluggedError;

/// One installed external command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PluginRecord {
    /// Unique plugin name, also the suffix of the backing binary.
    pub name: String,
    /// Description captured from the metadata probe at install time.
    pub description: String,
    /// Name of the owning gateway application.
    pub app_name: String,
}

impl PluginRecord {
    pub fn new(
        app_name: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            app_name: app_name.into(),
        }
    }

    /// Name of the executable backing this plugin: `<app-name>-<name>`.
    pub fn binary_name(&self) -> String {
        binary_name(&self.app_name, &self.name)
    }

    /// Serialize the record for storage.
    pub fn encode(&self) -> Result<Vec<u8>, PluggedError> {
        serde_json::to_vec(self).map_err(|e| {
            PluggedError::Internal(format!("unable to encode plugin '{}': {e}", self.name))
        })
    }

    /// Decode a stored record. `key` is the name it was stored under.
    pub fn decode(data: &[u8], key: &str) -> Result<Self, PluggedError> {
        let record: PluginRecord =
            serde_json::from_slice(data).map_err(|e| PluggedError::Decode {
                name: key.to_string(),
                source: Box::new(e),
            })?;

        if record.name != key {
            return Err(PluggedError::Decode {
                name: key.to_string(),
                source: format!("record is named '{}'", record.name).into(),
            });
        }

        Ok(record)
    }
}

/// Binary naming convention shared by the installer and the runner.
pub fn binary_name(app_name: &str, plugin: &str) -> String {
    format!("{app_name}-{plugin}")
}
