//! Spoken announcements for ticket calls.

mod command;
mod config;
mod log;
mod none;
mod traits;

pub use command::CommandAnnouncer;
pub use config::{AnnouncerBackend, AnnouncerConfig, CommandAnnouncerConfig};
pub use log::LogAnnouncer;
pub use none::NoneAnnouncer;
pub use traits::{Announcer, AnnouncerError};

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::queue::CalledTicketInfo;

/// Factory function to create an announcer from config
pub fn create_announcer(config: &AnnouncerConfig) -> Result<Box<dyn Announcer>, AnnouncerError> {
    match config.backend {
        AnnouncerBackend::None => Ok(Box::new(NoneAnnouncer::new())),
        AnnouncerBackend::Log => Ok(Box::new(LogAnnouncer::new())),
        AnnouncerBackend::Command => {
            let command = config.command.clone().ok_or_else(|| {
                AnnouncerError::ConfigurationError(
                    "announcer.command must be set when using the command backend".to_string(),
                )
            })?;
            Ok(Box::new(CommandAnnouncer::new(command)))
        }
    }
}

/// Render the spoken text for a call from a template.
///
/// Supported placeholders: `{ticket}`, `{workstation}`, `{stage}`.
pub fn render_announcement(template: &str, call: &CalledTicketInfo) -> String {
    template
        .replace("{ticket}", &call.ticket_number)
        .replace("{workstation}", &call.workstation_name)
        .replace("{stage}", &call.stage_name)
}

/// Speak in a background task. Failures are logged and swallowed.
pub fn announce_detached(
    announcer: Arc<dyn Announcer>,
    text: String,
    locale: String,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = announcer.speak(&text, &locale).await {
            warn!(backend = announcer.name(), "Announcement failed: {}", e);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockAnnouncer;
    use chrono::Utc;

    fn call() -> CalledTicketInfo {
        CalledTicketInfo {
            ticket_number: "P003".to_string(),
            stage_name: "Triage".to_string(),
            workstation_name: "Room 2".to_string(),
            called_at: Utc::now(),
        }
    }

    #[test]
    fn test_create_announcer_backends() {
        let mut config = AnnouncerConfig::default();
        assert_eq!(create_announcer(&config).unwrap().name(), "log");

        config.backend = AnnouncerBackend::None;
        assert_eq!(create_announcer(&config).unwrap().name(), "none");

        config.backend = AnnouncerBackend::Command;
        config.command = Some(CommandAnnouncerConfig::default());
        assert_eq!(create_announcer(&config).unwrap().name(), "command");
    }

    #[test]
    fn test_create_command_announcer_missing_config() {
        let config = AnnouncerConfig {
            backend: AnnouncerBackend::Command,
            ..Default::default()
        };
        let result = create_announcer(&config);
        assert!(matches!(result, Err(AnnouncerError::ConfigurationError(_))));
    }

    #[test]
    fn test_render_default_template() {
        let text = render_announcement(&AnnouncerConfig::default().template, &call());
        assert_eq!(text, "Senha P003, Room 2");
    }

    #[test]
    fn test_render_all_placeholders() {
        let text = render_announcement("{ticket} to {workstation} ({stage})", &call());
        assert_eq!(text, "P003 to Room 2 (Triage)");
    }

    #[tokio::test]
    async fn test_announce_detached_delivers() {
        let mock = Arc::new(MockAnnouncer::new());
        announce_detached(mock.clone(), "Senha C001".into(), "pt-BR".into())
            .await
            .unwrap();
        assert_eq!(
            mock.spoken(),
            vec![("Senha C001".to_string(), "pt-BR".to_string())]
        );
    }

    #[tokio::test]
    async fn test_announce_detached_swallows_failure() {
        let mock = Arc::new(MockAnnouncer::new());
        mock.set_fail(true);
        let handle = announce_detached(mock.clone(), "Senha C001".into(), "pt-BR".into());
        assert!(handle.await.is_ok());
        assert_eq!(mock.spoken().len(), 1);
    }
}
