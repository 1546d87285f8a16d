// SPDX-FileCopyrightText: 2026 Plugged Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin registry, installer, runner and dispatcher.
//!
//! A plugin is an external executable named `<app-name>-<plugin>` found on the
//! search path. Installing it probes the binary with `--plugged-description`
//! and records the answer in the catalog; invoking `<app-name> <plugin> ...`
//! hands control to the binary with the remaining arguments.

pub mod dispatch;
pub mod exec;
pub mod gateway;
pub mod installer;
pub mod registry;
pub mod runner;
pub mod search;
pub mod view;

pub use dispatch::{Action, Builtin};
pub use exec::{CaptureExecutor, Executor, Invocation, ProcessExecutor};
pub use gateway::{Gateway, GatewaySettings};
pub use installer::Installer;
pub use registry::PluginRegistry;
pub use runner::run_plugin;
pub use search::SearchPath;
