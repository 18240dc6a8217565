//! Configuration for call announcements.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Announcer configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnnouncerConfig {
    /// Which backend speaks the announcements.
    #[serde(default)]
    pub backend: AnnouncerBackend,

    /// Locale tag handed to the speech backend (e.g. "pt-BR").
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Text spoken when a ticket is called.
    /// Placeholders: `{ticket}`, `{workstation}`, `{stage}`.
    #[serde(default = "default_template")]
    pub template: String,

    /// Settings for the `command` backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<CommandAnnouncerConfig>,
}

impl Default for AnnouncerConfig {
    fn default() -> Self {
        Self {
            backend: AnnouncerBackend::default(),
            locale: default_locale(),
            template: default_template(),
            command: None,
        }
    }
}

/// Available announcer backends.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AnnouncerBackend {
    /// Discard announcements.
    None,
    /// Write announcements to the log.
    #[default]
    Log,
    /// Run an external speech program.
    Command,
}

/// External speech program settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommandAnnouncerConfig {
    /// Program to run (default: "espeak-ng").
    #[serde(default = "default_program")]
    pub program: PathBuf,

    /// Arguments; `{locale}` and `{text}` are substituted.
    #[serde(default = "default_args")]
    pub args: Vec<String>,

    /// Kill the program after this many seconds (default: 30).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CommandAnnouncerConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: default_args(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_locale() -> String {
    "pt-BR".to_string()
}

fn default_template() -> String {
    "Senha {ticket}, {workstation}".to_string()
}

fn default_program() -> PathBuf {
    PathBuf::from("espeak-ng")
}

fn default_args() -> Vec<String> {
    vec!["-v".to_string(), "{locale}".to_string(), "{text}".to_string()]
}

fn default_timeout_secs() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnnouncerConfig::default();
        assert_eq!(config.backend, AnnouncerBackend::Log);
        assert_eq!(config.locale, "pt-BR");
        assert!(config.command.is_none());
    }

    #[test]
    fn test_parse_command_backend() {
        let config: AnnouncerConfig = toml::from_str(
            r#"
backend = "command"
locale = "en-US"

[command]
program = "/usr/bin/say"
"#,
        )
        .unwrap();
        assert_eq!(config.backend, AnnouncerBackend::Command);
        let command = config.command.unwrap();
        assert_eq!(command.program, PathBuf::from("/usr/bin/say"));
        assert_eq!(command.args, default_args());
        assert_eq!(command.timeout_secs, 30);
    }
}
