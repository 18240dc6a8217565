use super::{types::Config, ConfigError};
use crate::announcer::AnnouncerBackend;
use crate::queue::MAX_HISTORY_CAPACITY;

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - History keeps between 1 and `MAX_HISTORY_CAPACITY` entries
/// - Seeded stages have non-blank names
/// - The command announcer has its command section
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.engine.history_capacity == 0 {
        return Err(ConfigError::ValidationError(
            "engine.history_capacity must be at least 1".to_string(),
        ));
    }

    if config.engine.history_capacity > MAX_HISTORY_CAPACITY {
        return Err(ConfigError::ValidationError(format!(
            "engine.history_capacity cannot exceed {}",
            MAX_HISTORY_CAPACITY
        )));
    }

    if let Some(index) = config
        .engine
        .stages
        .iter()
        .position(|s| s.name.trim().is_empty())
    {
        return Err(ConfigError::ValidationError(format!(
            "engine.stages[{}].name cannot be blank",
            index
        )));
    }

    if config.announcer.backend == AnnouncerBackend::Command && config.announcer.command.is_none()
    {
        return Err(ConfigError::ValidationError(
            "announcer.command must be set when backend = \"command\"".to_string(),
        ));
    }

    Ok(())
}
