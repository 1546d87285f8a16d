// SPDX-FileCopyrightText: 2026 Plugged Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The gateway: one invocation in, one action out.

use std::io::Write;

use plugged_config::PluggedConfig;
use plugged_core::PluggedError;
use plugged_storage::Store;
use tracing::{debug, warn};

use crate::dispatch::{is_reserved, Action, Builtin};
use crate::exec::{Executor, ProcessExecutor};
use crate::installer::Installer;
use crate::registry::PluginRegistry;
use crate::runner::run_plugin;
use crate::search::SearchPath;
use crate::view;

/// Identity and lookup settings of a gateway.
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    /// Application name, prefix of every plugin binary.
    pub name: String,
    /// One-line description shown in the help listing.
    pub description: String,
    pub search_path: SearchPath,
}

impl GatewaySettings {
    pub fn from_config(config: &PluggedConfig) -> Self {
        Self {
            name: config.gateway.name.clone(),
            description: config.gateway.description.clone(),
            search_path: SearchPath::new(config.plugins.effective_search_path()),
        }
    }
}

/// A gateway bound to an open plugin catalog.
#[derive(Debug)]
pub struct Gateway<E: Executor = ProcessExecutor> {
    settings: GatewaySettings,
    registry: PluginRegistry,
    executor: E,
}

impl<E: Executor> Gateway<E> {
    pub fn new(settings: GatewaySettings, registry: PluginRegistry, executor: E) -> Self {
        Self {
            settings,
            registry,
            executor,
        }
    }

    /// Open the catalog named by `config` and build a gateway around it.
    pub fn connect(config: &PluggedConfig, executor: E) -> Result<Self, PluggedError> {
        let path = config.database_path()?;
        let store = Store::open(&path, &config.storage)?;
        Ok(Self::new(
            GatewaySettings::from_config(config),
            PluginRegistry::new(store),
            executor,
        ))
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Dispatch one invocation. `argv[0]` is the program name.
    ///
    /// User-facing messages go to `out`. An `Err` means the invocation failed
    /// and the process should exit non-zero.
    pub fn run(&self, argv: &[String], out: &mut dyn Write) -> Result<(), PluggedError> {
        let action = Action::parse(argv);
        debug!(?action, "dispatching");

        match action {
            Action::Builtin(Builtin::Help) => self.help(out),
            Action::Builtin(Builtin::Install { names }) => self.install(&names, out),
            Action::Plugin { name, args } => self.delegate(&name, &args, out),
        }
    }

    /// Render the help listing of installed plugins.
    pub fn help(&self, out: &mut dyn Write) -> Result<(), PluggedError> {
        // A reserved name can only be in the catalog if written around the
        // installer; it is unreachable, so it is not listed.
        let plugins: Vec<_> = self
            .registry
            .list()?
            .into_iter()
            .filter(|p| !is_reserved(&p.name))
            .collect();

        view::HelpView {
            name: &self.settings.name,
            description: &self.settings.description,
            plugins: &plugins,
        }
        .render(out)?;
        Ok(())
    }

    /// Install each named plugin independently.
    ///
    /// Failures are reported per name and do not stop the batch, except a
    /// broken catalog, which aborts it.
    pub fn install(&self, names: &[String], out: &mut dyn Write) -> Result<(), PluggedError> {
        if names.is_empty() {
            view::render_install_usage(out, &self.settings.name)?;
            return Ok(());
        }

        let installer = Installer::new(
            &self.settings.name,
            &self.settings.search_path,
            &self.registry,
        );
        for name in names {
            match installer.install(name) {
                Ok(record) => debug!(plugin = %record.name, "install ok"),
                Err(e) if e.is_storage_failure() => return Err(e),
                Err(e) => {
                    warn!(plugin = %name, error = %e, "install failed");
                    view::render_install_failed(out, name, &e)?;
                }
            }
        }
        Ok(())
    }

    fn delegate(&self, name: &str, args: &[String], out: &mut dyn Write) -> Result<(), PluggedError> {
        let record = match self.registry.get(name) {
            Ok(record) => record,
            Err(e) if e.is_not_found() => {
                debug!(plugin = name, error = %e, "plugin not installed");
                view::render_not_found(out, &self.settings.name, name, &e)?;
                return self.help(out);
            }
            Err(e) => return Err(e),
        };

        if let Err(e) = run_plugin(&record, args, &self.settings.search_path, &self.executor) {
            warn!(plugin = name, error = %e, "plugin failed");
            view::render_run_failed(out, name, &e)?;
            self.help(out)?;
            return Err(e);
        }
        Ok(())
    }

    /// Release the catalog.
    pub fn close(self) -> Result<(), PluggedError> {
        self.registry.close()
    }
}
