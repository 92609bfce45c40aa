//! Polled conditions that drive automatic transitions.
//!
//! A condition pairs a predicate with an optional action. The active leaf
//! evaluates all of its conditions once per update, in registration order.

use super::error::StateError;

/// Fallible callback run when a condition's predicate holds.
pub type ConditionAction = Box<dyn Fn() -> Result<(), StateError>>;

/// A (predicate, action) pair.
///
/// Predicates are not compared or deduplicated; two conditions with
/// identical predicates are kept as two independent entries.
///
/// # Example
///
/// ```rust
/// use stateflow::core::{Condition, StateError};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let fired = Rc::new(Cell::new(false));
/// let flag = Rc::clone(&fired);
/// let condition = Condition::new(
///     || true,
///     Some(Box::new(move || {
///         flag.set(true);
///         Ok::<(), StateError>(())
///     })),
/// );
///
/// assert!(condition.check());
/// condition.fire().unwrap();
/// assert!(fired.get());
/// ```
pub struct Condition {
    predicate: Box<dyn Fn() -> bool>,
    action: Option<ConditionAction>,
}

impl Condition {
    /// Create a condition from a predicate and an optional action.
    pub fn new<P>(predicate: P, action: Option<ConditionAction>) -> Self
    where
        P: Fn() -> bool + 'static,
    {
        Condition {
            predicate: Box::new(predicate),
            action,
        }
    }

    /// Evaluate the predicate.
    pub fn check(&self) -> bool {
        (self.predicate)()
    }

    /// Run the action, if any.
    pub fn fire(&self) -> Result<(), StateError> {
        match &self.action {
            Some(action) => action(),
            None => Ok(()),
        }
    }

    /// Whether this condition carries an action.
    pub fn has_action(&self) -> bool {
        self.action.is_some()
    }
}

impl std::fmt::Debug for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Condition")
            .field("has_action", &self.has_action())
            .finish()
    }
}
