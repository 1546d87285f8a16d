// SPDX-FileCopyrightText: 2026 Plugged Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the plugged gateway.

use thiserror::Error;

/// Boxed cause carried by error variants that wrap a lower-level failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The primary error type used across the registry, installer, runner and dispatcher.
#[derive(Debug, Error)]
pub enum PluggedError {
    /// Configuration errors (invalid values, unresolvable home directory).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage errors (store could not be opened, transaction or write failed).
    #[error("storage error: {source}")]
    Storage { source: BoxError },

    /// A stored record could not be decoded back into a plugin record.
    #[error("unable to decode plugin '{name}': {source}")]
    Decode { name: String, source: BoxError },

    /// The plugin collection does not exist yet.
    #[error("there are no plugins installed")]
    NoPluginsInstalled,

    /// The plugin collection exists but holds no record under this name.
    #[error("plugin '{name}' was not found")]
    PluginNotFound { name: String },

    /// The name is reserved for a built-in action.
    #[error("'{name}' is reserved for a built-in command")]
    ReservedName { name: String },

    /// The name cannot be used to locate a plugin binary.
    #[error("invalid plugin name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// The plugin binary did not answer the metadata probe.
    #[error("'{binary} --plugged-description' failed: {message}")]
    Probe {
        binary: String,
        message: String,
        source: Option<BoxError>,
    },

    /// Installing a single plugin failed.
    #[error("{source}")]
    Install { name: String, source: Box<PluggedError> },

    /// The plugin binary could not be resolved, launched, or exited abnormally.
    #[error("plugin '{plugin}' failed to run: {message}")]
    Run {
        plugin: String,
        message: String,
        source: Option<BoxError>,
    },

    /// Writing gateway output failed.
    #[error("output error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PluggedError {
    /// Wrap any error as a storage failure.
    pub fn storage(source: impl Into<BoxError>) -> Self {
        PluggedError::Storage {
            source: source.into(),
        }
    }

    /// True for both not-found flavors, which the dispatcher recovers from.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            PluggedError::NoPluginsInstalled | PluggedError::PluginNotFound { .. }
        )
    }

    /// True when the catalog itself failed, directly or underneath an install.
    pub fn is_storage_failure(&self) -> bool {
        match self {
            PluggedError::Storage { .. } => true,
            PluggedError::Install { source, .. } => source.is_storage_failure(),
            _ => false,
        }
    }
}
