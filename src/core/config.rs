//! Per-node configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of transition records a node keeps unless configured otherwise.
pub const DEFAULT_HISTORY_CAPACITY: usize = 32;

/// Errors raised while loading a [`NodeConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid node configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Settings applied to a single state node.
///
/// Missing fields fall back to their defaults, so `{}` is a valid config.
///
/// # Example
///
/// ```rust
/// use stateflow::core::NodeConfig;
///
/// let config = NodeConfig::from_json(r#"{ "history_capacity": 4 }"#).unwrap();
/// assert_eq!(config.history_capacity, 4);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Maximum retained transition records; 0 disables history
    pub history_capacity: usize,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl NodeConfig {
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Config that keeps no transition history.
    pub fn without_history() -> Self {
        Self {
            history_capacity: 0,
        }
    }
}
