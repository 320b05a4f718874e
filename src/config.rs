//! Agent and match configuration.
//!
//! Both structs fill missing fields from their defaults, so a JSON file
//! only needs the values it overrides.

use std::path::Path;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::game::DEFAULT_MAX_TURNS;

/// Tunables of the reflex agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Per-turn decision budget in milliseconds.
    pub time_budget_ms: u64,
    /// Food carried before the offensive agent heads home.
    pub retreat_threshold: u32,
    /// Remaining enemy food at or below which every agent runs to its start.
    pub low_food_threshold: usize,
    /// Ghost distance below which `avoid_ghost` fires.
    pub ghost_danger_distance: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            time_budget_ms: 100,
            retreat_threshold: 3,
            low_food_threshold: 2,
            ghost_danger_distance: 3,
        }
    }
}

impl AgentConfig {
    /// Per-turn decision budget.
    #[must_use]
    pub const fn time_budget(&self) -> Duration {
        Duration::from_millis(self.time_budget_ms)
    }
}

/// Configuration for one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Plies before the game ends.
    pub max_turns: u32,
    /// Check engine invariants after every ply.
    pub check_invariants: bool,
    /// Settings shared by every agent.
    pub agents: AgentConfig,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_turns: DEFAULT_MAX_TURNS,
            check_invariants: false,
            agents: AgentConfig::default(),
        }
    }
}

impl MatchConfig {
    /// Load a match configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        load_json(path)
    }
}

/// Read and deserialize a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AgentConfig::default();
        assert_eq!(config.time_budget(), Duration::from_millis(100));
        assert_eq!(config.retreat_threshold, 3);
        assert_eq!(config.low_food_threshold, 2);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: MatchConfig =
            serde_json::from_str(r#"{"max_turns": 300, "agents": {"retreat_threshold": 5}}"#)
                .unwrap();
        assert_eq!(config.max_turns, 300);
        assert_eq!(config.agents.retreat_threshold, 5);
        assert_eq!(config.agents.ghost_danger_distance, 3);
        assert!(!config.check_invariants);
    }

    #[test]
    fn test_load_reports_path() {
        let err = MatchConfig::load(Path::new("/nonexistent/match.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/match.json"));
    }
}
