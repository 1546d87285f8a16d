// SPDX-FileCopyrightText: 2026 Plugged Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classification of a gateway invocation.
//!
//! The action word is resolved to an [`Action`] before any handler runs, so a
//! reserved word can never reach the plugin catalog.

/// Action word that shows the gateway help.
pub const HELP_ACTION: &str = "help";
/// Flag form of [`HELP_ACTION`].
pub const HELP_FLAG: &str = "--help";
/// Flag that installs the plugins named after it.
pub const INSTALL_FLAG: &str = "--plugged-install";
/// Flag every plugin binary must answer with its one-line description.
pub const PROBE_FLAG: &str = "--plugged-description";

/// Names no plugin may take.
pub const RESERVED_NAMES: [&str; 4] = [HELP_ACTION, HELP_FLAG, INSTALL_FLAG, PROBE_FLAG];

/// Built-in gateway actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Builtin {
    Help,
    Install { names: Vec<String> },
}

/// What a single invocation asks the gateway to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Builtin(Builtin),
    /// Delegate to the installed plugin `name` with the remaining arguments.
    Plugin { name: String, args: Vec<String> },
}

impl Action {
    /// Classify `argv`, where `argv[0]` is the program name.
    pub fn parse(argv: &[String]) -> Self {
        let Some((action, rest)) = argv.get(1..).and_then(<[String]>::split_first) else {
            return Action::Builtin(Builtin::Help);
        };

        match action.as_str() {
            HELP_ACTION | HELP_FLAG => Action::Builtin(Builtin::Help),
            INSTALL_FLAG => Action::Builtin(Builtin::Install {
                names: rest.to_vec(),
            }),
            _ => Action::Plugin {
                name: action.clone(),
                args: rest.to_vec(),
            },
        }
    }
}

pub fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn no_action_is_help() {
        assert_eq!(Action::parse(&argv(&["demo"])), Action::Builtin(Builtin::Help));
        assert_eq!(Action::parse(&[]), Action::Builtin(Builtin::Help));
    }

    #[test]
    fn help_word_and_flag_are_help() {
        assert_eq!(
            Action::parse(&argv(&["demo", "help"])),
            Action::Builtin(Builtin::Help)
        );
        assert_eq!(
            Action::parse(&argv(&["demo", "--help"])),
            Action::Builtin(Builtin::Help)
        );
        assert_eq!(
            Action::parse(&argv(&["demo", "help", "find"])),
            Action::Builtin(Builtin::Help)
        );
    }

    #[test]
    fn install_collects_every_name() {
        assert_eq!(
            Action::parse(&argv(&["demo", "--plugged-install", "find", "grep"])),
            Action::Builtin(Builtin::Install {
                names: argv(&["find", "grep"])
            })
        );
        assert_eq!(
            Action::parse(&argv(&["demo", "--plugged-install"])),
            Action::Builtin(Builtin::Install { names: vec![] })
        );
    }

    #[test]
    fn anything_else_is_a_plugin_with_verbatim_args() {
        assert_eq!(
            Action::parse(&argv(&["demo", "find", "stuff", "--help", ""])),
            Action::Plugin {
                name: "find".into(),
                args: argv(&["stuff", "--help", ""]),
            }
        );
    }

    #[test]
    fn reserved_names() {
        for name in RESERVED_NAMES {
            assert!(is_reserved(name), "{name}");
        }
        assert!(!is_reserved("find"));
        assert!(!is_reserved("HELP"));
    }
}
