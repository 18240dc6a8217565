use async_trait::async_trait;

use super::{Announcer, AnnouncerError};

/// Announcer that stays silent.
pub struct NoneAnnouncer;

impl NoneAnnouncer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoneAnnouncer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Announcer for NoneAnnouncer {
    async fn speak(&self, _text: &str, _locale: &str) -> Result<(), AnnouncerError> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "none"
    }
}
