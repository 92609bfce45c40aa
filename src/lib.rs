//! Stateflow: a hierarchical state machine runtime
//!
//! A state tree is built from [`StateNode`]s, each of which is both a
//! container of named child states and a runnable state. The host drives the
//! root once per frame; the tree routes updates and events down the active
//! path to the single active leaf.
//!
//! # Core Concepts
//!
//! - **Active stack**: every node keeps a LIFO stack of entered children.
//!   `change_state` replaces the top, `push_state`/`pop_state` nest
//! - **Active leaf**: the node reached by following the top of every stack
//!   from the root; only its update hook, conditions and events are live
//! - **Conditions**: predicates polled once per update at the active leaf,
//!   each paired with an action run when it holds
//! - **Events**: named handlers dispatched synchronously to the active leaf
//!
//! Everything runs synchronously on the caller's thread. Callbacks may call
//! back into the tree through a [`WeakStateNode`].
//!
//! # Example
//!
//! ```rust
//! use stateflow::core::{StateError, StateNode};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! # fn main() -> Result<(), StateError> {
//! let root = StateNode::new();
//! let combat = StateNode::new();
//! let attacking = StateNode::new();
//! root.add_child("Combat", combat.clone())?;
//! combat.add_child("Attacking", attacking.clone())?;
//!
//! let swings = Rc::new(Cell::new(0));
//! let counter = Rc::clone(&swings);
//! attacking.set_event("swing", move |_| {
//!     counter.set(counter.get() + 1);
//!     Ok(())
//! })?;
//!
//! root.push_state("Combat")?;
//! combat.push_state("Attacking")?;
//! root.trigger_event("swing")?;
//!
//! assert_eq!(swings.get(), 1);
//! assert_eq!(root.active_path(), vec!["root", "Combat", "Attacking"]);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod core;

// Re-export commonly used types
pub use crate::builder::StateNodeBuilder;
pub use crate::core::{NodeConfig, StateError, StateNode, WeakStateNode};
