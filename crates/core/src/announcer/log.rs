use async_trait::async_trait;
use tracing::info;

use super::{Announcer, AnnouncerError};

/// Announcer that writes each announcement to the log.
pub struct LogAnnouncer;

impl LogAnnouncer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogAnnouncer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Announcer for LogAnnouncer {
    async fn speak(&self, text: &str, locale: &str) -> Result<(), AnnouncerError> {
        info!(locale, "Announcement: {}", text);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
