// SPDX-FileCopyrightText: 2026 Plugged Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistent catalog of installed plugins.
//!
//! Records live in the `plugins` bucket of the gateway's [`Store`], keyed by
//! plugin name. Listing is tolerant of damaged records; lookup by name is not.

use plugged_core::{PluggedError, PluginRecord};
use plugged_storage::Store;
use tracing::{debug, warn};

/// Bucket holding one encoded [`PluginRecord`] per installed plugin.
pub const PLUGINS_BUCKET: &str = "plugins";

/// Registry of installed plugins backed by a [`Store`].
#[derive(Debug)]
pub struct PluginRegistry {
    store: Store,
}

impl PluginRegistry {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// All installed plugins, sorted by name.
    ///
    /// A record that fails to decode is skipped with a warning so that one bad
    /// entry cannot hide the rest of the catalog.
    pub fn list(&self) -> Result<Vec<PluginRecord>, PluggedError> {
        self.store.view(|tx| {
            let Some(bucket) = tx.bucket(PLUGINS_BUCKET)? else {
                return Ok(Vec::new());
            };

            let mut plugins = Vec::new();
            bucket.for_each(|key, data| {
                let name = String::from_utf8_lossy(key);
                match PluginRecord::decode(data, &name) {
                    Ok(record) => plugins.push(record),
                    Err(e) => warn!(plugin = %name, error = %e, "skipping unreadable plugin record"),
                }
                Ok(())
            })?;
            Ok(plugins)
        })
    }

    /// Look up a single plugin by name.
    pub fn get(&self, name: &str) -> Result<PluginRecord, PluggedError> {
        self.store.view(|tx| {
            let bucket = tx
                .bucket(PLUGINS_BUCKET)?
                .ok_or(PluggedError::NoPluginsInstalled)?;
            let data = bucket
                .get(name.as_bytes())?
                .ok_or_else(|| PluggedError::PluginNotFound {
                    name: name.to_string(),
                })?;
            PluginRecord::decode(&data, name)
        })
    }

    /// Insert the record, replacing any previous record with the same name.
    pub fn upsert(&self, record: &PluginRecord) -> Result<(), PluggedError> {
        let data = record.encode()?;
        self.store.update(|tx| {
            tx.create_bucket_if_not_exists(PLUGINS_BUCKET)?
                .put(record.name.as_bytes(), &data)
        })?;
        debug!(plugin = %record.name, "plugin record stored");
        Ok(())
    }

    /// Close the underlying store.
    pub fn close(self) -> Result<(), PluggedError> {
        self.store.close()
    }
}
