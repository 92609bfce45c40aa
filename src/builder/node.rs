//! Builder for wiring state nodes.

use crate::core::{NodeConfig, StateError, StateNode, WeakStateNode};
use std::any::Any;

/// Builder for constructing a state node with a fluent API.
///
/// Registrations that can collide (children, events) return a `Result`, so
/// a builder chain reads with `?` between steps.
///
/// # Example
///
/// ```rust
/// use stateflow::builder::{change_to, StateNodeBuilder};
/// use stateflow::core::StateError;
///
/// # fn main() -> Result<(), StateError> {
/// let root = StateNodeBuilder::new();
/// let machine = root.handle();
///
/// let idle = StateNodeBuilder::new()
///     .condition(|| true, change_to(&machine, "Moving"))
///     .build()?;
/// let moving = StateNodeBuilder::new().build()?;
///
/// let root = root
///     .child("Idle", idle)?
///     .child("Moving", moving)?
///     .initial("Idle")
///     .build()?;
///
/// root.update(0.016)?;
/// assert_eq!(root.active_path(), vec!["root", "Moving"]);
/// # Ok(())
/// # }
/// ```
pub struct StateNodeBuilder {
    node: StateNode,
    initial: Option<String>,
}

impl StateNodeBuilder {
    /// Create a builder for a node with the default configuration.
    pub fn new() -> Self {
        Self::with_config(NodeConfig::default())
    }

    /// Create a builder for a node with its own configuration.
    pub fn with_config(config: NodeConfig) -> Self {
        Self {
            node: StateNode::with_config(config),
            initial: None,
        }
    }

    /// Weak handle to the node being built, for callbacks that drive it.
    pub fn handle(&self) -> WeakStateNode {
        self.node.downgrade()
    }

    /// Set the enter hook.
    pub fn on_enter<F>(self, action: F) -> Self
    where
        F: Fn() + 'static,
    {
        self.node.set_enter_action(action);
        self
    }

    /// Set the exit hook.
    pub fn on_exit<F>(self, action: F) -> Self
    where
        F: Fn() + 'static,
    {
        self.node.set_exit_action(action);
        self
    }

    /// Set the update hook.
    pub fn on_update<F>(self, action: F) -> Self
    where
        F: Fn(f32) + 'static,
    {
        self.node.set_update_action(action);
        self
    }

    /// Add a condition polled while the node is the active leaf.
    pub fn condition<P, A>(self, predicate: P, action: A) -> Self
    where
        P: Fn() -> bool + 'static,
        A: Fn() -> Result<(), StateError> + 'static,
    {
        self.node.add_condition(predicate, action);
        self
    }

    /// Add a condition with no action.
    pub fn check<P>(self, predicate: P) -> Self
    where
        P: Fn() -> bool + 'static,
    {
        self.node.add_check(predicate);
        self
    }

    /// Register an untyped event handler.
    pub fn event<F>(self, id: impl Into<String>, handler: F) -> Result<Self, StateError>
    where
        F: Fn(&dyn Any) -> Result<(), StateError> + 'static,
    {
        self.node.set_event(id, handler)?;
        Ok(self)
    }

    /// Register an event handler whose payload is cast to `T`.
    pub fn typed_event<T, F>(self, id: impl Into<String>, handler: F) -> Result<Self, StateError>
    where
        T: Any,
        F: Fn(&T) -> Result<(), StateError> + 'static,
    {
        self.node.set_typed_event(id, handler)?;
        Ok(self)
    }

    /// Register a child state (required before `initial` can name it).
    pub fn child(self, name: impl Into<String>, node: StateNode) -> Result<Self, StateError> {
        self.node.add_child(name, node)?;
        Ok(self)
    }

    /// Child to push when the node is built (optional).
    pub fn initial(mut self, name: impl Into<String>) -> Self {
        self.initial = Some(name.into());
        self
    }

    /// Finish the node, pushing the initial child if one was set.
    ///
    /// The initial child's enter hook runs here.
    pub fn build(self) -> Result<StateNode, StateError> {
        if let Some(initial) = &self.initial {
            self.node.push_state(initial)?;
        }
        Ok(self.node)
    }
}

impl Default for StateNodeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
