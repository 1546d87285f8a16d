// SPDX-FileCopyrightText: 2026 Plugged Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Catalog schema creation.
//!
//! The schema is created with `IF NOT EXISTS` statements inside an immediate
//! transaction, so several processes opening a fresh catalog at once serialize
//! on the write lock instead of racing.

use plugged_core::PluggedError;
use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::database::map_sql_err;

/// Version recorded in `PRAGMA user_version`.
pub const SCHEMA_VERSION: i64 = 1;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS buckets (
    name TEXT PRIMARY KEY NOT NULL
);

CREATE TABLE IF NOT EXISTS entries (
    bucket TEXT NOT NULL REFERENCES buckets(name) ON DELETE CASCADE,
    key    BLOB NOT NULL,
    value  BLOB NOT NULL,
    PRIMARY KEY (bucket, key)
) WITHOUT ROWID;
";

/// Create the bucket tables if absent and stamp the schema version.
///
/// Fails if the file was stamped by a newer schema than this build knows.
pub fn ensure_schema(conn: &Connection) -> Result<(), PluggedError> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)
        .map_err(map_sql_err)?;

    let version: i64 = tx
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(map_sql_err)?;
    if version > SCHEMA_VERSION {
        return Err(PluggedError::storage(format!(
            "catalog schema version {version} is newer than supported version {SCHEMA_VERSION}"
        )));
    }

    tx.execute_batch(SCHEMA).map_err(map_sql_err)?;
    if version < SCHEMA_VERSION {
        tx.pragma_update(None, "user_version", SCHEMA_VERSION)
            .map_err(map_sql_err)?;
    }

    tx.commit().map_err(map_sql_err)
}
