//! Errors raised by state node registration, transitions and dispatch.

use thiserror::Error;

/// Errors that can occur when wiring or driving a state tree.
///
/// Every variant describes a contract violation by the caller. All checks
/// run before the node is mutated, so a failed call leaves the tree exactly
/// as it was.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StateError {
    #[error("Child state already exists: {name}")]
    DuplicateName { name: String },

    #[error("Event already exists: {id}")]
    DuplicateEvent { id: String },

    #[error("Child state [{name}] not found")]
    UnknownState { name: String },

    #[error("Event [{id}] not registered on the active state")]
    UnknownEvent { id: String },

    #[error("Cannot pop from an empty active stack")]
    EmptyStack,

    #[error("State [{name}] is already attached to a parent")]
    AlreadyAttached { name: String },

    #[error("State [{name}] cannot be added below itself")]
    CyclicChild { name: String },

    #[error("Event [{id}] expected a payload of type {expected}")]
    PayloadMismatch { id: String, expected: &'static str },

    #[error("State node no longer exists")]
    NodeDropped,

    #[error("State action failed: {0}")]
    ActionFailed(String),
}
