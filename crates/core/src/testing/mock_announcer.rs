//! Mock announcer for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::announcer::{Announcer, AnnouncerError};

/// Mock implementation of the Announcer trait.
///
/// Records every `(text, locale)` pair it is asked to speak, and can be
/// switched into a failing mode to exercise error handling.
///
/// # Example
///
/// ```rust,ignore
/// use nextqueue_core::testing::MockAnnouncer;
///
/// let announcer = MockAnnouncer::new();
/// announcer.speak("Senha P001, Guichê 1", "pt-BR").await?;
/// assert_eq!(announcer.spoken().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockAnnouncer {
    spoken: Mutex<Vec<(String, String)>>,
    fail: AtomicBool,
}

impl MockAnnouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent calls fail (they are still recorded).
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Everything spoken so far, oldest first.
    pub fn spoken(&self) -> Vec<(String, String)> {
        self.spoken
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    /// Texts spoken so far, oldest first.
    pub fn texts(&self) -> Vec<String> {
        self.spoken().into_iter().map(|(text, _)| text).collect()
    }

    pub fn clear(&self) {
        if let Ok(mut spoken) = self.spoken.lock() {
            spoken.clear();
        }
    }
}

#[async_trait]
impl Announcer for MockAnnouncer {
    async fn speak(&self, text: &str, locale: &str) -> Result<(), AnnouncerError> {
        if let Ok(mut spoken) = self.spoken.lock() {
            spoken.push((text.to_string(), locale.to_string()));
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(AnnouncerError::Failed {
                status: "mock failure".to_string(),
            });
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_calls() {
        let announcer = MockAnnouncer::new();
        announcer.speak("one", "pt-BR").await.unwrap();
        announcer.speak("two", "en-US").await.unwrap();

        assert_eq!(announcer.texts(), vec!["one", "two"]);
        announcer.clear();
        assert!(announcer.spoken().is_empty());
    }

    #[tokio::test]
    async fn test_fail_mode() {
        let announcer = MockAnnouncer::new();
        announcer.set_fail(true);
        assert!(announcer.speak("one", "pt-BR").await.is_err());
        assert_eq!(announcer.spoken().len(), 1);
    }
}
