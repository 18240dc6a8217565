//! Configuration for the queue engine.

use serde::{Deserialize, Serialize};

/// Upper bound on [`EngineConfig::history_capacity`].
pub const MAX_HISTORY_CAPACITY: usize = 50;

/// Queue engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Number of call records kept in history (most recent first), at most
    /// [`MAX_HISTORY_CAPACITY`].
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Workstation label used when a stage is added without one.
    #[serde(default = "default_workstation_type")]
    pub default_workstation_type: String,

    /// Whether new tickets go straight to the first stage on start-up.
    #[serde(default)]
    pub auto_forward: bool,

    /// Stages created when the engine starts.
    #[serde(default)]
    pub stages: Vec<StageSeed>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_capacity: default_history_capacity(),
            default_workstation_type: default_workstation_type(),
            auto_forward: false,
            stages: Vec::new(),
        }
    }
}

/// A stage to create at start-up.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StageSeed {
    pub name: String,
    /// Falls back to `EngineConfig::default_workstation_type`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workstation_type_name: Option<String>,
    /// Workstations to open in this stage.
    #[serde(default = "default_seed_workstations")]
    pub workstations: u32,
}

fn default_history_capacity() -> usize {
    MAX_HISTORY_CAPACITY
}

fn default_workstation_type() -> String {
    "Guichê".to_string()
}

fn default_seed_workstations() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.history_capacity, 50);
        assert_eq!(config.default_workstation_type, "Guichê");
        assert!(!config.auto_forward);
        assert!(config.stages.is_empty());
    }

    #[test]
    fn test_stage_seed_defaults() {
        let seed: StageSeed = toml::from_str(r#"name = "Triage""#).unwrap();
        assert_eq!(seed.name, "Triage");
        assert_eq!(seed.workstation_type_name, None);
        assert_eq!(seed.workstations, 1);
    }
}
