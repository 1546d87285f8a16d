// SPDX-FileCopyrightText: 2026 Plugged Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugged - An extendable command-line gateway.
//!
//! `plugged <plugin> [args...]` hands control to the installed executable
//! `plugged-<plugin>`; `plugged --plugged-install <plugin>...` installs them.
//! Arguments are forwarded verbatim, so no option parsing happens here.

use std::io::Write;

use plugged_config::PluggedConfig;
use plugged_core::PluggedError;
use plugged_plugin::{Gateway, ProcessExecutor};
use tracing::debug;

fn main() {
    let config = match plugged_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            plugged_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging.log_level);
    debug!(gateway = %config.gateway.name, "config loaded");

    let argv: Vec<String> = std::env::args_os()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();

    if let Err(e) = run(&config, &argv) {
        debug!(error = %e, "invocation failed");
        // Run failures were already reported alongside the help listing.
        if !matches!(e, PluggedError::Run { .. }) {
            eprintln!("[ERROR] {e}");
        }
        std::process::exit(1);
    }
}

/// Open the catalog, dispatch one invocation, and close the catalog.
///
/// When a plugin is delegated to, the process image is replaced and this never
/// returns.
fn run(config: &PluggedConfig, argv: &[String]) -> Result<(), PluggedError> {
    let gateway = Gateway::connect(config, ProcessExecutor)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let result = gateway.run(argv, &mut out);
    out.flush()?;

    gateway.close()?;
    result
}

/// Initialize the tracing subscriber on stderr, leaving stdout to the
/// gateway and its plugins.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("plugged={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
