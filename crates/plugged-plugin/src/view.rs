// SPDX-FileCopyrightText: 2026 Plugged Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text rendered to the user by the gateway's built-in actions.

use std::fmt::Display;
use std::io::{self, Write};

use plugged_core::PluginRecord;

use crate::dispatch::{HELP_ACTION, INSTALL_FLAG};

const HELP_DESCRIPTION: &str = "This info.";
const TAB_WIDTH: usize = 4;

/// The gateway help listing.
#[derive(Debug)]
pub struct HelpView<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub plugins: &'a [PluginRecord],
}

impl HelpView<'_> {
    pub fn render(&self, out: &mut dyn Write) -> io::Result<()> {
        let name = self.name;
        writeln!(out, "USAGE: {name} command [options]")?;
        writeln!(out)?;
        writeln!(out, "{name} - {}", self.description)?;
        writeln!(out)?;
        writeln!(out, "Available commands:")?;
        writeln!(out)?;
        out.write_all(self.command_list().as_bytes())?;
        writeln!(out)?;
        writeln!(out, "To get help for any of commands you can do '{name} help command'")?;
        writeln!(out, "or '{name} command --help'.")
    }

    /// One line per plugin plus the help entry.
    ///
    /// The name column is padded with tabs to the next multiple of
    /// `TAB_WIDTH` past the longest name. Only the first line of a multi-line
    /// description is shown.
    fn command_list(&self) -> String {
        let entries: Vec<(&str, &str)> = self
            .plugins
            .iter()
            .map(|p| (p.name.as_str(), p.description.lines().next().unwrap_or("")))
            .chain(std::iter::once((HELP_ACTION, HELP_DESCRIPTION)))
            .collect();
        let cells: Vec<(String, &str)> = entries
            .into_iter()
            .map(|(name, desc)| (format!("- {name}"), desc))
            .collect();
        let width = cells
            .iter()
            .map(|(cell, _)| cell.chars().count())
            .max()
            .unwrap_or(0)
            .div_ceil(TAB_WIDTH)
            * TAB_WIDTH;

        cells
            .iter()
            .map(|(cell, desc)| {
                let tabs = (width - cell.chars().count()).div_ceil(TAB_WIDTH);
                format!("{cell}{} - {desc}\n", "\t".repeat(tabs))
            })
            .collect()
    }
}

/// Error banner shown when the requested plugin is not installed.
pub fn render_not_found(
    out: &mut dyn Write,
    app: &str,
    plugin: &str,
    cause: &dyn Display,
) -> io::Result<()> {
    writeln!(out, "[ERROR] Unable to find plugin '{plugin}'.")?;
    writeln!(out, "Try installing it with '{app} {INSTALL_FLAG} {plugin}'.")?;
    writeln!(out, "Details: {cause}")?;
    writeln!(out)
}

/// Error banner shown when an installed plugin could not be run.
pub fn render_run_failed(out: &mut dyn Write, plugin: &str, cause: &dyn Display) -> io::Result<()> {
    writeln!(out, "[ERROR] Unable to run plugin '{plugin}'.")?;
    writeln!(out, "Details: {cause}")?;
    writeln!(out)
}

/// One line per failed install in a batch.
pub fn render_install_failed(out: &mut dyn Write, plugin: &str, cause: &dyn Display) -> io::Result<()> {
    writeln!(out, "{plugin}: failed to install - {cause}")
}

/// Shown for `--plugged-install` without names.
pub fn render_install_usage(out: &mut dyn Write, app: &str) -> io::Result<()> {
    writeln!(out, "Usage: {app} {INSTALL_FLAG} <plugin>...")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(view: &HelpView<'_>) -> String {
        let mut out = Vec::new();
        view.render(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn help_with_no_plugins_lists_only_help() {
        let text = render(&HelpView {
            name: "demo",
            description: "A demo gateway.",
            plugins: &[],
        });
        let expected = "USAGE: demo command [options]\n\
                        \n\
                        demo - A demo gateway.\n\
                        \n\
                        Available commands:\n\
                        \n\
                        - help\t - This info.\n\
                        \n\
                        To get help for any of commands you can do 'demo help command'\n\
                        or 'demo command --help'.\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn names_are_tab_padded_past_the_longest() {
        let plugins = vec![
            PluginRecord::new("demo", "find", "Find stuff."),
            PluginRecord::new("demo", "x", "Short."),
        ];
        let text = render(&HelpView {
            name: "demo",
            description: "d",
            plugins: &plugins,
        });

        assert!(text.contains("- find\t - Find stuff.\n"), "{text}");
        assert!(text.contains("- x\t\t - Short.\n"), "{text}");
        assert!(text.contains("- help\t - This info.\n"), "{text}");
    }

    #[test]
    fn name_filling_the_column_gets_no_tab() {
        let plugins = vec![PluginRecord::new("demo", "abcdef", "Exact.")];
        let text = render(&HelpView {
            name: "demo",
            description: "d",
            plugins: &plugins,
        });
        assert!(text.contains("- abcdef - Exact.\n"), "{text}");
        assert!(text.contains("- help\t\t - This info.\n"), "{text}");
    }

    #[test]
    fn only_first_description_line_is_listed() {
        let plugins = vec![PluginRecord::new("demo", "multi", "First.\nSecond.")];
        let text = render(&HelpView {
            name: "demo",
            description: "d",
            plugins: &plugins,
        });
        assert!(text.contains("- multi\t - First.\n"));
        assert!(!text.contains("Second."));
    }

    #[test]
    fn not_found_banner() {
        let mut out = Vec::new();
        render_not_found(&mut out, "demo", "nothere", &"there are no plugins installed").unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "[ERROR] Unable to find plugin 'nothere'.\n\
             Try installing it with 'demo --plugged-install nothere'.\n\
             Details: there are no plugins installed\n\n"
        );
    }

    #[test]
    fn install_failure_line() {
        let mut out = Vec::new();
        render_install_failed(&mut out, "find", &"boom").unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "find: failed to install - boom\n");
    }
}
