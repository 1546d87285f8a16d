// SPDX-FileCopyrightText: 2026 Plugged Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for plugged integration tests.
//!
//! Provides a throwaway gateway installation with shell-script plugins, so
//! tests can drive install, help and delegation without touching the real
//! home directory or `PATH`.

pub mod harness;

pub use harness::{plugin_script, Outcome, SharedBuffer, TestHarness};
