// SPDX-FileCopyrightText: 2026 Plugged Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Store lifecycle and transactions.
//!
//! One [`Store`] is opened per invocation. Reads run in deferred transactions;
//! writes take SQLite's write lock up front (`BEGIN IMMEDIATE`) and wait up to
//! the configured busy timeout for other processes holding it.

use std::path::{Path, PathBuf};

use plugged_config::model::StorageConfig;
use plugged_core::PluggedError;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use tracing::debug;

use crate::bucket::Tx;
use crate::schema;

/// Map a rusqlite error into the storage variant.
pub(crate) fn map_sql_err(e: rusqlite::Error) -> PluggedError {
    PluggedError::storage(e)
}

/// An open catalog file.
pub struct Store {
    conn: Connection,
    path: PathBuf,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").field("path", &self.path).finish()
    }
}

impl Store {
    /// Open (creating if needed) the store at `path`.
    pub fn open(path: &Path, config: &StorageConfig) -> Result<Self, PluggedError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(PluggedError::storage)?;
        }

        let conn = Connection::open(path).map_err(map_sql_err)?;
        conn.busy_timeout(config.busy_timeout())
            .map_err(map_sql_err)?;
        conn.pragma_update(None, "foreign_keys", true)
            .map_err(map_sql_err)?;

        if config.wal_mode {
            let mode: String = conn
                .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
                .map_err(map_sql_err)?;
            debug!(journal_mode = %mode, "journal mode set");
        }

        schema::ensure_schema(&conn)?;
        debug!(path = %path.display(), "store opened");

        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    /// Open a private in-memory store.
    pub fn open_in_memory() -> Result<Self, PluggedError> {
        let conn = Connection::open_in_memory().map_err(map_sql_err)?;
        conn.pragma_update(None, "foreign_keys", true)
            .map_err(map_sql_err)?;
        schema::ensure_schema(&conn)?;
        Ok(Self {
            conn,
            path: PathBuf::from(":memory:"),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `f` in a read-only transaction.
    pub fn view<T, F>(&self, f: F) -> Result<T, PluggedError>
    where
        F: FnOnce(&Tx<'_>) -> Result<T, PluggedError>,
    {
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Deferred)
            .map_err(map_sql_err)?;
        let out = f(&Tx::new(&tx, false))?;
        tx.rollback().map_err(map_sql_err)?;
        Ok(out)
    }

    /// Run `f` in a read-write transaction.
    ///
    /// Changes are committed only if `f` returns `Ok`; otherwise every write
    /// made inside `f` is rolled back.
    pub fn update<T, F>(&self, f: F) -> Result<T, PluggedError>
    where
        F: FnOnce(&Tx<'_>) -> Result<T, PluggedError>,
    {
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)
            .map_err(map_sql_err)?;
        let out = f(&Tx::new(&tx, true))?;
        tx.commit().map_err(map_sql_err)?;
        Ok(out)
    }

    /// Close the store, releasing its file lock.
    ///
    /// Dropping a `Store` also closes it but swallows close errors.
    pub fn close(self) -> Result<(), PluggedError> {
        let path = self.path;
        self.conn.close().map_err(|(_, e)| map_sql_err(e))?;
        debug!(path = %path.display(), "store closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use tempfile::tempdir;

    fn config() -> StorageConfig {
        StorageConfig::default()
    }

    fn entry_count(store: &Store, bucket: &str) -> usize {
        store
            .view(|tx| {
                let mut count = 0;
                if let Some(bucket) = tx.bucket(bucket)? {
                    bucket.for_each(|_, _| {
                        count += 1;
                        Ok(())
                    })?;
                }
                Ok(count)
            })
            .unwrap()
    }

    #[test]
    fn open_creates_file_and_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/home/.demo.db");

        let store = Store::open(&path, &config()).unwrap();
        assert!(path.exists(), "database file should be created");
        assert_eq!(store.path(), path);
        store.close().unwrap();
    }

    #[test]
    fn missing_bucket_is_none() {
        let store = Store::open_in_memory().unwrap();
        let found = store.view(|tx| Ok(tx.bucket("plugins")?.is_some())).unwrap();
        assert!(!found);
    }

    #[test]
    fn update_creates_bucket_and_persists_values() {
        let store = Store::open_in_memory().unwrap();

        store
            .update(|tx| {
                let bucket = tx.create_bucket_if_not_exists("plugins")?;
                bucket.put(b"find", b"one")
            })
            .unwrap();

        let value = store
            .view(|tx| match tx.bucket("plugins")? {
                Some(bucket) => bucket.get(b"find"),
                None => Ok(None),
            })
            .unwrap();
        assert_eq!(value.as_deref(), Some(&b"one"[..]));
    }

    #[test]
    fn put_overwrites_existing_key() {
        let store = Store::open_in_memory().unwrap();
        for value in [&b"first"[..], &b"second"[..]] {
            store
                .update(|tx| tx.create_bucket_if_not_exists("plugins")?.put(b"find", value))
                .unwrap();
        }

        let value = store
            .view(|tx| tx.bucket("plugins")?.unwrap().get(b"find"))
            .unwrap();
        assert_eq!(value.as_deref(), Some(&b"second"[..]));
        assert_eq!(entry_count(&store, "plugins"), 1);
    }

    #[test]
    fn failed_update_rolls_back_every_write() {
        let store = Store::open_in_memory().unwrap();

        let result: Result<(), PluggedError> = store.update(|tx| {
            tx.create_bucket_if_not_exists("plugins")?
                .put(b"find", b"half-written")?;
            Err(PluggedError::Internal("abort".into()))
        });
        assert!(result.is_err());

        let exists = store.view(|tx| Ok(tx.bucket("plugins")?.is_some())).unwrap();
        assert!(!exists, "bucket creation should have been rolled back");
    }

    #[test]
    fn view_rejects_writes() {
        let store = Store::open_in_memory().unwrap();
        store
            .update(|tx| tx.create_bucket_if_not_exists("plugins").map(|_| ()))
            .unwrap();

        let create = store.view(|tx| tx.create_bucket_if_not_exists("other").map(|_| ()));
        assert!(create.unwrap_err().to_string().contains("read-only"));

        let put = store.view(|tx| tx.bucket("plugins")?.unwrap().put(b"k", b"v"));
        assert!(put.unwrap_err().to_string().contains("read-only"));
    }

    #[test]
    fn empty_key_is_rejected() {
        let store = Store::open_in_memory().unwrap();
        let err = store
            .update(|tx| tx.create_bucket_if_not_exists("plugins")?.put(b"", b"v"))
            .unwrap_err();
        assert!(matches!(err, PluggedError::Storage { .. }));
    }

    #[test]
    fn for_each_visits_in_key_order() {
        let store = Store::open_in_memory().unwrap();
        store
            .update(|tx| {
                let bucket = tx.create_bucket_if_not_exists("plugins")?;
                for key in ["zebra", "alpha", "middle"] {
                    bucket.put(key.as_bytes(), b"x")?;
                }
                Ok(())
            })
            .unwrap();

        let keys = store
            .view(|tx| {
                let mut keys = Vec::new();
                tx.bucket("plugins")?.unwrap().for_each(|k, _| {
                    keys.push(String::from_utf8_lossy(k).into_owned());
                    Ok(())
                })?;
                Ok(keys)
            })
            .unwrap();
        assert_eq!(keys, vec!["alpha", "middle", "zebra"]);
    }

    #[test]
    fn buckets_are_isolated() {
        let store = Store::open_in_memory().unwrap();
        store
            .update(|tx| {
                tx.create_bucket_if_not_exists("plugins")?.put(b"find", b"1")?;
                tx.create_bucket_if_not_exists("other")?.put(b"find", b"2")
            })
            .unwrap();

        let value = store
            .view(|tx| tx.bucket("plugins")?.unwrap().get(b"find"))
            .unwrap();
        assert_eq!(value.as_deref(), Some(&b"1"[..]));
    }

    #[test]
    fn data_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".demo.db");

        let store = Store::open(&path, &config()).unwrap();
        store
            .update(|tx| tx.create_bucket_if_not_exists("plugins")?.put(b"find", b"v"))
            .unwrap();
        store.close().unwrap();

        let store = Store::open(&path, &config()).unwrap();
        let value = store
            .view(|tx| tx.bucket("plugins")?.unwrap().get(b"find"))
            .unwrap();
        assert_eq!(value.as_deref(), Some(&b"v"[..]));
    }

    #[test]
    fn newer_schema_version_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".demo.db");
        {
            let conn = Connection::open(&path).unwrap();
            conn.pragma_update(None, "user_version", 99).unwrap();
        }

        let err = Store::open(&path, &config()).unwrap_err();
        assert!(err.to_string().contains("newer than supported"));
    }

    #[test]
    fn separate_handles_serialize_concurrent_writers() {
        let dir = tempdir().unwrap();
        let path = Arc::new(dir.path().join(".demo.db"));
        Store::open(&path, &config()).unwrap().close().unwrap();

        let writers: Vec<_> = (0..2)
            .map(|writer| {
                let path = Arc::clone(&path);
                thread::spawn(move || {
                    let store = Store::open(&path, &config()).unwrap();
                    for i in 0..20 {
                        let key = format!("w{writer}-{i:02}");
                        store
                            .update(|tx| {
                                tx.create_bucket_if_not_exists("plugins")?
                                    .put(key.as_bytes(), b"v")
                            })
                            .unwrap();
                    }
                    store.close().unwrap();
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let store = Store::open(&path, &config()).unwrap();
        assert_eq!(entry_count(&store, "plugins"), 40);
    }
}
