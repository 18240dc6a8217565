//! Announcer backed by an external speech program such as `espeak-ng`.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tracing::debug;

use super::config::CommandAnnouncerConfig;
use super::{Announcer, AnnouncerError};

/// Runs a speech program once per announcement.
pub struct CommandAnnouncer {
    config: CommandAnnouncerConfig,
}

impl CommandAnnouncer {
    pub fn new(config: CommandAnnouncerConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(CommandAnnouncerConfig::default())
    }

    /// Substitute `{locale}` and `{text}` in the configured arguments.
    fn build_args(&self, text: &str, locale: &str) -> Vec<String> {
        self.config
            .args
            .iter()
            .map(|arg| arg.replace("{locale}", locale).replace("{text}", text))
            .collect()
    }
}

#[async_trait]
impl Announcer for CommandAnnouncer {
    async fn speak(&self, text: &str, locale: &str) -> Result<(), AnnouncerError> {
        let args = self.build_args(text, locale);
        debug!(program = ?self.config.program, ?args, "Running speech program");

        let mut child = Command::new(&self.config.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => AnnouncerError::ProgramNotFound {
                    path: self.config.program.clone(),
                },
                _ => AnnouncerError::Io(e),
            })?;

        let waited = timeout(Duration::from_secs(self.config.timeout_secs), child.wait()).await;
        let status = match waited {
            Ok(status) => status?,
            Err(_) => {
                let _ = child.kill().await;
                return Err(AnnouncerError::Timeout {
                    timeout_secs: self.config.timeout_secs,
                });
            }
        };

        if status.success() {
            Ok(())
        } else {
            Err(AnnouncerError::Failed {
                status: status.to_string(),
            })
        }
    }

    fn name(&self) -> &'static str {
        "command"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn announcer(program: &str, args: &[&str], timeout_secs: u64) -> CommandAnnouncer {
        CommandAnnouncer::new(CommandAnnouncerConfig {
            program: PathBuf::from(program),
            args: args.iter().map(|a| a.to_string()).collect(),
            timeout_secs,
        })
    }

    #[test]
    fn test_build_args_substitutes_placeholders() {
        let announcer = CommandAnnouncer::with_defaults();
        let args = announcer.build_args("Senha P001, Guichê 2", "pt-BR");
        assert_eq!(args, vec!["-v", "pt-BR", "Senha P001, Guichê 2"]);
    }

    #[test]
    fn test_build_args_inline_placeholders() {
        let announcer = announcer("say", &["--voice={locale}", "--", "{text}!"], 5);
        let args = announcer.build_args("C007", "en-US");
        assert_eq!(args, vec!["--voice=en-US", "--", "C007!"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_speak_success() {
        let announcer = announcer("sh", &["-c", "exit 0"], 5);
        assert!(announcer.speak("hello", "en").await.is_ok());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_speak_passes_text_as_argument() {
        let announcer = announcer("sh", &["-c", "test \"$1\" = \"C001\"", "sh", "{text}"], 5);
        assert!(announcer.speak("C001", "en").await.is_ok());
        assert!(matches!(
            announcer.speak("C002", "en").await,
            Err(AnnouncerError::Failed { .. })
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_speak_nonzero_exit() {
        let announcer = announcer("sh", &["-c", "exit 3"], 5);
        let result = announcer.speak("hello", "en").await;
        assert!(matches!(result, Err(AnnouncerError::Failed { .. })));
    }

    #[tokio::test]
    async fn test_speak_missing_program() {
        let announcer = announcer("/nonexistent/speech-program", &[], 5);
        let result = announcer.speak("hello", "en").await;
        assert!(matches!(result, Err(AnnouncerError::ProgramNotFound { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_speak_timeout() {
        let announcer = announcer("sleep", &["5"], 1);
        let result = announcer.speak("hello", "en").await;
        assert!(matches!(
            result,
            Err(AnnouncerError::Timeout { timeout_secs: 1 })
        ));
    }
}
