//! Hierarchical state machine core.
//!
//! This module contains the state tree runtime:
//! - `StateNode`, the self-similar node that owns children and an active stack
//! - Conditions polled once per update at the active leaf
//! - Event handlers with optional typed payloads
//! - Bounded transition history and per-node configuration

mod condition;
mod config;
mod error;
mod event;
mod history;
mod node;
mod report;

pub use condition::{Condition, ConditionAction};
pub use config::{ConfigError, NodeConfig, DEFAULT_HISTORY_CAPACITY};
pub use error::StateError;
pub use history::{TransitionHistory, TransitionKind, TransitionRecord};
pub use node::{StateNode, WeakStateNode, ROOT_LABEL};
pub use report::NodeReport;
