// SPDX-FileCopyrightText: 2026 Plugged Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin installation: locate the binary, probe it, record it.

use std::path::Path;
use std::process::{Command, Stdio};

use plugged_core::{binary_name, PluggedError, PluginRecord};
use tracing::{debug, info};

use crate::dispatch::{is_reserved, PROBE_FLAG};
use crate::registry::PluginRegistry;
use crate::search::SearchPath;

/// Installs plugins for one gateway.
#[derive(Debug)]
pub struct Installer<'a> {
    app_name: &'a str,
    search: &'a SearchPath,
    registry: &'a PluginRegistry,
}

impl<'a> Installer<'a> {
    pub fn new(app_name: &'a str, search: &'a SearchPath, registry: &'a PluginRegistry) -> Self {
        Self {
            app_name,
            search,
            registry,
        }
    }

    /// Install (or reinstall) the plugin `name`.
    ///
    /// Every failure is reported as [`PluggedError::Install`] wrapping the cause.
    /// Nothing is written unless the probe succeeds.
    pub fn install(&self, name: &str) -> Result<PluginRecord, PluggedError> {
        self.try_install(name).map_err(|e| PluggedError::Install {
            name: name.to_string(),
            source: Box::new(e),
        })
    }

    fn try_install(&self, name: &str) -> Result<PluginRecord, PluggedError> {
        validate_name(name)?;

        let binary = binary_name(self.app_name, name);
        let path = self
            .search
            .resolve(&binary)
            .map_err(|e| PluggedError::Probe {
                binary: binary.clone(),
                message: "binary not found on search path".into(),
                source: Some(Box::new(e)),
            })?;
        debug!(plugin = name, path = %path.display(), "probing plugin");

        let description = probe_description(&binary, &path)?;
        let record = PluginRecord::new(self.app_name, name, description);
        self.registry.upsert(&record)?;

        info!(plugin = name, "plugin installed");
        Ok(record)
    }
}

/// Reject names that could never be dispatched or resolved.
pub fn validate_name(name: &str) -> Result<(), PluggedError> {
    let invalid = |reason: &str| PluggedError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("name must not be empty"));
    }
    if name.contains(['/', '\\']) {
        return Err(invalid("name must not contain a path separator"));
    }
    if is_reserved(name) {
        return Err(PluggedError::ReservedName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Run `<path> --plugged-description` and return its stdout, trailing
/// whitespace removed.
fn probe_description(binary: &str, path: &Path) -> Result<String, PluggedError> {
    let output = Command::new(path)
        .arg(PROBE_FLAG)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| PluggedError::Probe {
            binary: binary.to_string(),
            message: e.to_string(),
            source: Some(Box::new(e)),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim_end();
        let message = if stderr.is_empty() {
            output.status.to_string()
        } else {
            format!("{}: {stderr}", output.status)
        };
        return Err(PluggedError::Probe {
            binary: binary.to_string(),
            message,
            source: None,
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
}
