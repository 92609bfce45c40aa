//! Builder API for ergonomic state tree construction.
//!
//! This module provides a fluent node builder and ready-made transition
//! actions for conditions and event handlers.

pub mod node;

pub use node::StateNodeBuilder;

use crate::core::{StateError, WeakStateNode};

/// Action that replaces the top of `machine`'s active stack with `name`.
///
/// # Example
///
/// ```
/// use stateflow::builder::change_to;
/// use stateflow::core::StateNode;
///
/// let root = StateNode::new();
/// let idle = StateNode::new();
/// root.add_child("Idle", idle.clone()).unwrap();
/// root.add_child("Moving", StateNode::new()).unwrap();
/// root.push_state("Idle").unwrap();
///
/// let go = change_to(&root.downgrade(), "Moving");
/// idle.set_event("go", move |_| go()).unwrap();
///
/// root.trigger_event("go").unwrap();
/// assert_eq!(root.active_path(), vec!["root", "Moving"]);
/// ```
pub fn change_to(
    machine: &WeakStateNode,
    name: &str,
) -> impl Fn() -> Result<(), StateError> + 'static {
    let machine = machine.clone();
    let name = name.to_string();
    move || machine.upgrade()?.change_state(&name)
}

/// Action that pushes `name` onto `machine`'s active stack.
pub fn push_to(
    machine: &WeakStateNode,
    name: &str,
) -> impl Fn() -> Result<(), StateError> + 'static {
    let machine = machine.clone();
    let name = name.to_string();
    move || machine.upgrade()?.push_state(&name)
}

/// Action that pops the top of `machine`'s active stack.
pub fn pop_from(machine: &WeakStateNode) -> impl Fn() -> Result<(), StateError> + 'static {
    let machine = machine.clone();
    move || machine.upgrade()?.pop_state()
}
