// SPDX-FileCopyrightText: 2026 Plugged Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hand-off of control to a plugin binary.
//!
//! [`ProcessExecutor`] replaces the gateway process with the plugin so the
//! plugin owns the terminal, signals and exit status. [`CaptureExecutor`] runs
//! the plugin as a child and copies its output into a writer, for tests and
//! embedding.

use std::cell::RefCell;
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use plugged_core::BoxError;

/// Capability that transfers control to a resolved plugin binary.
pub trait Executor {
    /// Run `binary`. `argv[0]` is the program name the plugin sees and the
    /// rest are its arguments. `env` replaces the environment entirely.
    ///
    /// On success a process-replacing executor never returns.
    fn execute(
        &self,
        binary: &Path,
        argv: &[String],
        env: &[(OsString, OsString)],
    ) -> Result<(), BoxError>;
}

fn command(binary: &Path, args: &[String], env: &[(OsString, OsString)]) -> Command {
    let mut cmd = Command::new(binary);
    cmd.args(args)
        .env_clear()
        .envs(env.iter().map(|(k, v)| (k, v)));
    cmd
}

/// Replaces the current process image with the plugin.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessExecutor;

impl Executor for ProcessExecutor {
    #[cfg(unix)]
    fn execute(
        &self,
        binary: &Path,
        argv: &[String],
        env: &[(OsString, OsString)],
    ) -> Result<(), BoxError> {
        use std::os::unix::process::CommandExt;

        let (program, args) = argv.split_first().ok_or("empty argument vector")?;
        // exec only returns on failure.
        let err = command(binary, args, env).arg0(program).exec();
        Err(Box::new(err))
    }

    #[cfg(not(unix))]
    fn execute(
        &self,
        binary: &Path,
        argv: &[String],
        env: &[(OsString, OsString)],
    ) -> Result<(), BoxError> {
        let args = argv.get(1..).unwrap_or_default();
        let status = command(binary, args, env).status()?;
        std::process::exit(status.code().unwrap_or(1));
    }
}

/// One call recorded by [`CaptureExecutor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub binary: PathBuf,
    pub argv: Vec<String>,
    pub env: Vec<(OsString, OsString)>,
}

/// Runs the plugin as a child process and writes its stdout to a sink.
///
/// A non-zero exit status is reported as an error carrying the child's stderr.
#[derive(Debug)]
pub struct CaptureExecutor<W> {
    sink: RefCell<W>,
    invocations: RefCell<Vec<Invocation>>,
}

impl<W: Write> CaptureExecutor<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink: RefCell::new(sink),
            invocations: RefCell::new(Vec::new()),
        }
    }

    /// Every call made so far, oldest first.
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.borrow().clone()
    }

    pub fn into_sink(self) -> W {
        self.sink.into_inner()
    }
}

impl<W: Write> Executor for CaptureExecutor<W> {
    fn execute(
        &self,
        binary: &Path,
        argv: &[String],
        env: &[(OsString, OsString)],
    ) -> Result<(), BoxError> {
        self.invocations.borrow_mut().push(Invocation {
            binary: binary.to_path_buf(),
            argv: argv.to_vec(),
            env: env.to_vec(),
        });

        let args = argv.get(1..).unwrap_or_default();
        let output = command(binary, args, env)
            .stdin(Stdio::null())
            .output()?;

        self.sink.borrow_mut().write_all(&output.stdout)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!("{}: {}", output.status, stderr.trim_end()).into());
        }
        Ok(())
    }
}
