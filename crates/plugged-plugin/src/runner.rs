// SPDX-FileCopyrightText: 2026 Plugged Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delegation of an invocation to an installed plugin.

use plugged_core::{PluggedError, PluginRecord};
use tracing::debug;

use crate::exec::Executor;
use crate::search::SearchPath;

/// Resolve the plugin's binary and hand control to it through `executor`.
///
/// The plugin sees its binary name as `argv[0]`, `args` verbatim after it,
/// and the gateway's full environment.
pub fn run_plugin<E: Executor + ?Sized>(
    record: &PluginRecord,
    args: &[String],
    search: &SearchPath,
    executor: &E,
) -> Result<(), PluggedError> {
    let binary = record.binary_name();
    let path = search.resolve(&binary).map_err(|e| PluggedError::Run {
        plugin: record.name.clone(),
        message: format!("'{binary}' not found on search path"),
        source: Some(Box::new(e)),
    })?;

    let mut argv = Vec::with_capacity(args.len() + 1);
    argv.push(binary);
    argv.extend_from_slice(args);
    let env: Vec<_> = std::env::vars_os().collect();

    debug!(plugin = %record.name, path = %path.display(), args = args.len(), "running plugin");
    executor
        .execute(&path, &argv, &env)
        .map_err(|e| PluggedError::Run {
            plugin: record.name.clone(),
            message: e.to_string(),
            source: Some(e),
        })
}
