// SPDX-FileCopyrightText: 2026 Plugged Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core types for the plugged gateway.
//!
//! This crate provides the error type shared by every other crate in the
//! workspace and the [`PluginRecord`] persisted in the plugin catalog.

pub mod error;
pub mod record;

// Re-export key items at crate root for ergonomic imports.
pub use error::{BoxError, PluggedError};
pub use record::{binary_name, PluginRecord};
