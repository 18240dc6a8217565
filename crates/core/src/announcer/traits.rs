use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnnouncerError {
    #[error("Speech program not found: {path}")]
    ProgramNotFound { path: PathBuf },

    #[error("Speech program exited with {status}")]
    Failed { status: String },

    #[error("Speech program timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

/// Text-to-speech output for ticket calls.
///
/// Output is best effort: callers log failures and move on.
#[async_trait]
pub trait Announcer: Send + Sync {
    /// Speak `text` in the given locale (e.g. "pt-BR").
    async fn speak(&self, text: &str, locale: &str) -> Result<(), AnnouncerError>;

    /// Name of this backend.
    fn name(&self) -> &'static str;
}
