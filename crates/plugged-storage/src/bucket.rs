// SPDX-FileCopyrightText: 2026 Plugged Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transaction and bucket handles.
//!
//! A [`Tx`] is only reachable inside [`Store::view`](crate::Store::view) or
//! [`Store::update`](crate::Store::update); buckets borrowed from it cannot
//! outlive the transaction.

use plugged_core::PluggedError;
use rusqlite::{params, Connection, OptionalExtension};

use crate::database::map_sql_err;

/// A read-only or read-write transaction over the store.
pub struct Tx<'a> {
    conn: &'a Connection,
    writable: bool,
}

impl<'a> Tx<'a> {
    pub(crate) fn new(conn: &'a Connection, writable: bool) -> Self {
        Self { conn, writable }
    }

    /// Look up an existing bucket. `None` if it was never created.
    pub fn bucket(&self, name: &str) -> Result<Option<Bucket<'a>>, PluggedError> {
        let exists = self
            .conn
            .query_row(
                "SELECT 1 FROM buckets WHERE name = ?1",
                params![name],
                |_| Ok(()),
            )
            .optional()
            .map_err(map_sql_err)?
            .is_some();

        Ok(exists.then(|| Bucket {
            conn: self.conn,
            name: name.to_string(),
            writable: self.writable,
        }))
    }

    /// Create the bucket unless it already exists, and return it.
    pub fn create_bucket_if_not_exists(&self, name: &str) -> Result<Bucket<'a>, PluggedError> {
        self.ensure_writable()?;
        if name.is_empty() {
            return Err(PluggedError::storage("bucket name must not be empty"));
        }

        self.conn
            .execute(
                "INSERT OR IGNORE INTO buckets (name) VALUES (?1)",
                params![name],
            )
            .map_err(map_sql_err)?;

        Ok(Bucket {
            conn: self.conn,
            name: name.to_string(),
            writable: true,
        })
    }

    fn ensure_writable(&self) -> Result<(), PluggedError> {
        if self.writable {
            Ok(())
        } else {
            Err(PluggedError::storage("transaction is read-only"))
        }
    }
}

/// A named collection of byte keys and values, iterated in key order.
pub struct Bucket<'a> {
    conn: &'a Connection,
    name: String,
    writable: bool,
}

impl Bucket<'_> {
    /// Value stored under `key`, if any.
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, PluggedError> {
        self.conn
            .query_row(
                "SELECT value FROM entries WHERE bucket = ?1 AND key = ?2",
                params![self.name, key],
                |row| row.get(0),
            )
            .optional()
            .map_err(map_sql_err)
    }

    /// Insert or replace the value stored under `key`.
    pub fn put(&self, key: &[u8], value: &[u8]) -> Result<(), PluggedError> {
        if !self.writable {
            return Err(PluggedError::storage("transaction is read-only"));
        }
        if key.is_empty() {
            return Err(PluggedError::storage("key must not be empty"));
        }

        self.conn
            .execute(
                "INSERT INTO entries (bucket, key, value) VALUES (?1, ?2, ?3)
                 ON CONFLICT (bucket, key) DO UPDATE SET value = excluded.value",
                params![self.name, key, value],
            )
            .map_err(map_sql_err)?;
        Ok(())
    }

    /// Visit every entry in byte order of the key.
    ///
    /// An error returned by `f` stops the iteration and is returned as-is.
    pub fn for_each<F>(&self, mut f: F) -> Result<(), PluggedError>
    where
        F: FnMut(&[u8], &[u8]) -> Result<(), PluggedError>,
    {
        let mut stmt = self
            .conn
            .prepare("SELECT key, value FROM entries WHERE bucket = ?1 ORDER BY key")
            .map_err(map_sql_err)?;
        let mut rows = stmt.query(params![self.name]).map_err(map_sql_err)?;

        while let Some(row) = rows.next().map_err(map_sql_err)? {
            let key: Vec<u8> = row.get(0).map_err(map_sql_err)?;
            let value: Vec<u8> = row.get(1).map_err(map_sql_err)?;
            f(&key, &value)?;
        }
        Ok(())
    }
}
