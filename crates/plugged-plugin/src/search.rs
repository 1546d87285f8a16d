// SPDX-FileCopyrightText: 2026 Plugged Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Executable lookup on the gateway's search path.

use std::ffi::OsString;
use std::path::PathBuf;

/// Directories searched for plugin binaries, in `PATH` syntax.
#[derive(Debug, Clone)]
pub struct SearchPath {
    paths: Option<OsString>,
    cwd: PathBuf,
}

impl SearchPath {
    /// Search `paths` (a `PATH`-style list). `None` finds nothing.
    pub fn new(paths: Option<OsString>) -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self { paths, cwd }
    }

    /// Absolute path of the first executable named `binary`.
    pub fn resolve(&self, binary: &str) -> Result<PathBuf, which::Error> {
        which::which_in(binary, self.paths.as_ref(), &self.cwd)
    }
}
