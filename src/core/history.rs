//! Transition history tracking.
//!
//! Each state node keeps a bounded log of the transitions applied to its own
//! active stack. The log is diagnostic only; nothing can be restored from it.

use super::config::DEFAULT_HISTORY_CAPACITY;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Which stack operation produced a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionKind {
    Push,
    Pop,
    Change,
}

/// Record of a single transition on one node's active stack.
///
/// `from` is the child on top of the stack before the transition and `to`
/// the child on top after it. `None` means the stack was empty, i.e. the
/// node itself was the active leaf.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Stack operation that ran
    pub kind: TransitionKind,
    /// Top of the stack before the transition
    pub from: Option<String>,
    /// Top of the stack after the transition
    pub to: Option<String>,
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
}

impl TransitionRecord {
    /// Create a record stamped with the current time.
    pub fn new(kind: TransitionKind, from: Option<String>, to: Option<String>) -> Self {
        Self {
            kind,
            from,
            to,
            timestamp: Utc::now(),
        }
    }
}

/// Bounded, ordered history of transitions.
///
/// When the history is full the oldest record is dropped. A capacity of
/// zero disables recording entirely.
///
/// # Example
///
/// ```rust
/// use stateflow::core::{TransitionHistory, TransitionKind, TransitionRecord};
///
/// let mut history = TransitionHistory::with_capacity(8);
/// history.record(TransitionRecord::new(
///     TransitionKind::Push,
///     None,
///     Some("Idle".to_string()),
/// ));
/// history.record(TransitionRecord::new(
///     TransitionKind::Change,
///     Some("Idle".to_string()),
///     Some("Moving".to_string()),
/// ));
///
/// assert_eq!(history.get_path(), vec![None, Some("Idle"), Some("Moving")]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "StoredHistory")]
pub struct TransitionHistory {
    capacity: usize,
    transitions: VecDeque<TransitionRecord>,
}

/// Wire shape of a history, trimmed to its capacity on load.
#[derive(Deserialize)]
struct StoredHistory {
    capacity: usize,
    transitions: VecDeque<TransitionRecord>,
}

impl From<StoredHistory> for TransitionHistory {
    fn from(stored: StoredHistory) -> Self {
        let mut transitions = stored.transitions;
        let excess = transitions.len().saturating_sub(stored.capacity);
        transitions.drain(..excess);
        Self {
            capacity: stored.capacity,
            transitions,
        }
    }
}

impl Default for TransitionHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl TransitionHistory {
    /// Create an empty history holding at most `capacity` records.
    ///
    /// Storage grows with use; `capacity` only bounds it.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            transitions: VecDeque::new(),
        }
    }

    /// Append a record, evicting the oldest one when full.
    pub fn record(&mut self, transition: TransitionRecord) {
        if self.capacity == 0 {
            return;
        }
        while self.transitions.len() >= self.capacity {
            self.transitions.pop_front();
        }
        self.transitions.push_back(transition);
    }

    /// Get the sequence of stack tops traversed.
    ///
    /// Starts with the `from` of the oldest retained record, followed by the
    /// `to` of every record.
    pub fn get_path(&self) -> Vec<Option<&str>> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.front() {
            path.push(first.from.as_deref());
        }
        for transition in &self.transitions {
            path.push(transition.to.as_deref());
        }
        path
    }

    /// Time between the oldest and newest retained records.
    ///
    /// Returns `None` if the history is empty.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.front(), self.transitions.back()) {
            last.timestamp
                .signed_duration_since(first.timestamp)
                .to_std()
                .ok()
        } else {
            None
        }
    }

    /// Retained records, oldest first.
    pub fn transitions(&self) -> impl Iterator<Item = &TransitionRecord> {
        self.transitions.iter()
    }

    /// Most recent record.
    pub fn last(&self) -> Option<&TransitionRecord> {
        self.transitions.back()
    }

    /// Number of retained records.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Maximum number of retained records.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop all records, keeping the capacity.
    pub fn clear(&mut self) {
        self.transitions.clear();
    }
}
