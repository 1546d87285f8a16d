// SPDX-FileCopyrightText: 2026 Plugged Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end gateway testing.
//!
//! `TestHarness` sets up a throwaway home directory and a bin directory of
//! shell-script plugins, then drives the full gateway stack one invocation at
//! a time. Each invocation opens the catalog, dispatches, and closes it again,
//! as separate gateway processes would.

use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use plugged_config::PluggedConfig;
use plugged_core::PluggedError;
use plugged_plugin::{CaptureExecutor, Gateway, Invocation};
use tempfile::TempDir;
use tracing::debug;

/// A cloneable in-memory writer shared by the gateway and the plugins it runs.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Drain everything written so far as text.
    pub fn take_string(&self) -> String {
        let bytes = std::mem::take(&mut *self.lock());
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Result of one gateway invocation.
#[derive(Debug)]
pub struct Outcome {
    pub result: Result<(), PluggedError>,
    /// Gateway messages and plugin stdout, interleaved as written.
    pub output: String,
    /// Plugin binaries the gateway handed control to.
    pub invocations: Vec<Invocation>,
}

impl Outcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    app_name: String,
    description: String,
    scripts: Vec<(String, String)>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            app_name: "demo".to_string(),
            description: "A demo gateway.".to_string(),
            scripts: Vec::new(),
        }
    }

    /// Set the gateway application name.
    pub fn with_app_name(mut self, name: &str) -> Self {
        self.app_name = name.to_string();
        self
    }

    /// Set the gateway description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Add a well-behaved plugin: it answers the probe with `description`
    /// and otherwise runs `body`.
    pub fn with_plugin(mut self, name: &str, description: &str, body: &str) -> Self {
        let script = plugin_script(description, body);
        self.scripts.push((name.to_string(), script));
        self
    }

    /// Add a plugin whose entire script is `script`.
    pub fn with_raw_plugin(mut self, name: &str, script: &str) -> Self {
        self.scripts.push((name.to_string(), script.to_string()));
        self
    }

    /// Create the temp directories and write every plugin script.
    pub fn build(self) -> io::Result<TestHarness> {
        let home = TempDir::new()?;
        let bin = TempDir::new()?;

        let harness = TestHarness {
            app_name: self.app_name,
            description: self.description,
            home,
            bin,
            buffer: SharedBuffer::default(),
        };
        for (name, script) in &self.scripts {
            harness.write_plugin(name, script)?;
        }
        Ok(harness)
    }
}

/// Script text for a plugin that answers `--plugged-description`.
pub fn plugin_script(description: &str, body: &str) -> String {
    format!(
        "#!/bin/sh\nif [ \"$1\" = \"--plugged-description\" ]; then\n  echo \"{description}\"\n  exit 0\nfi\n{body}\n"
    )
}

/// A temporary gateway installation.
pub struct TestHarness {
    app_name: String,
    description: String,
    home: TempDir,
    bin: TempDir,
    buffer: SharedBuffer,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn home(&self) -> &Path {
        self.home.path()
    }

    pub fn bin_dir(&self) -> &Path {
        self.bin.path()
    }

    /// Where the gateway keeps its catalog.
    pub fn database_path(&self) -> PathBuf {
        self.home().join(format!(".{}.db", self.app_name))
    }

    /// Search path: the bin directory, then the system `PATH`.
    pub fn search_path(&self) -> OsString {
        let mut dirs = vec![self.bin_dir().to_path_buf()];
        if let Some(path) = std::env::var_os("PATH") {
            dirs.extend(std::env::split_paths(&path));
        }
        std::env::join_paths(dirs).unwrap_or_else(|_| self.bin_dir().as_os_str().to_owned())
    }

    /// Configuration equivalent to what the binary would load for this harness.
    pub fn config(&self) -> PluggedConfig {
        let mut config = PluggedConfig::default();
        config.gateway.name = self.app_name.clone();
        config.gateway.description = self.description.clone();
        config.gateway.home = Some(self.home().to_string_lossy().into_owned());
        config.plugins.search_path = Some(self.search_path().to_string_lossy().into_owned());
        config
    }

    /// Write (or replace) the executable `<app>-<name>` in the bin directory.
    pub fn write_plugin(&self, name: &str, script: &str) -> io::Result<PathBuf> {
        let path = self.bin_dir().join(format!("{}-{name}", self.app_name));
        fs::write(&path, script)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
        }
        Ok(path)
    }

    /// Delete the plugin binary, leaving any catalog record in place.
    pub fn remove_plugin(&self, name: &str) -> io::Result<()> {
        fs::remove_file(self.bin_dir().join(format!("{}-{name}", self.app_name)))
    }

    /// Open a gateway on this harness, capturing plugin output.
    pub fn connect(&self) -> Result<Gateway<CaptureExecutor<SharedBuffer>>, PluggedError> {
        Gateway::connect(&self.config(), CaptureExecutor::new(self.buffer.clone()))
    }

    /// Run `<app> <args...>` as one gateway invocation.
    pub fn invoke(&self, args: &[&str]) -> Outcome {
        let mut argv = vec![self.app_name.clone()];
        argv.extend(args.iter().map(|a| a.to_string()));
        debug!(?argv, "harness invocation");

        let mut out = self.buffer.clone();
        let (result, invocations) = match self.connect() {
            Ok(gateway) => {
                let result = gateway.run(&argv, &mut out);
                let invocations = gateway.executor().invocations();
                let result = result.and(gateway.close());
                (result, invocations)
            }
            Err(e) => (Err(e), Vec::new()),
        };

        Outcome {
            result,
            output: self.buffer.take_string(),
            invocations,
        }
    }
}
