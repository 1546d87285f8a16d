// SPDX-FileCopyrightText: 2026 Plugged Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the plugged gateway.
//!
//! Exposes a small transactional key-value model: a [`Store`] holds named
//! buckets of byte keys and values. Buckets are created lazily by the first
//! write, so "never written" is distinguishable from "empty". Cross-process
//! safety comes from SQLite's file locking plus a configurable busy timeout.

pub mod bucket;
pub mod database;
pub mod schema;

pub use bucket::{Bucket, Tx};
pub use database::Store;
