//! Hierarchical state node.
//!
//! A [`StateNode`] is both a container of named child states and a runnable
//! state. Each node keeps an active stack of its children; following the top
//! of every stack from the root leads to the single active leaf, which is the
//! only node whose update hook, conditions and events are live.

use super::condition::Condition;
use super::config::NodeConfig;
use super::error::StateError;
use super::event::{self, EventHandler};
use super::history::{TransitionHistory, TransitionKind, TransitionRecord};
use std::any::Any;
use std::cell::{OnceCell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::{debug, trace, warn};

/// Label reported by nodes that were never attached to a parent.
pub const ROOT_LABEL: &str = "root";

type Hook = Rc<dyn Fn()>;
type UpdateHook = Rc<dyn Fn(f32)>;

struct NodeInner {
    name: OnceCell<String>,
    parent: OnceCell<Weak<NodeInner>>,
    config: NodeConfig,
    children: RefCell<HashMap<String, StateNode>>,
    active: RefCell<Vec<StateNode>>,
    events: RefCell<HashMap<String, EventHandler>>,
    conditions: RefCell<Rc<Vec<Rc<Condition>>>>,
    on_enter: RefCell<Option<Hook>>,
    on_exit: RefCell<Option<Hook>>,
    on_update: RefCell<Option<UpdateHook>>,
    history: RefCell<TransitionHistory>,
}

/// Shared handle to a node in a state tree.
///
/// Cloning the handle does not clone the node: all clones refer to the same
/// state, and equality is identity. Nodes are single-threaded.
///
/// Callbacks that need to drive the tree should capture a
/// [`WeakStateNode`] rather than a `StateNode`, otherwise the node and its
/// own callback keep each other alive.
///
/// # Example
///
/// ```rust
/// use stateflow::core::StateNode;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let root = StateNode::new();
/// let idle = StateNode::new();
/// let moving = StateNode::new();
///
/// let ticks = Rc::new(Cell::new(0.0));
/// let sink = Rc::clone(&ticks);
/// moving.set_update_action(move |dt| sink.set(sink.get() + dt));
///
/// root.add_child("Idle", idle.clone()).unwrap();
/// root.add_child("Moving", moving).unwrap();
///
/// let machine = root.downgrade();
/// idle.add_condition(|| true, move || machine.upgrade()?.change_state("Moving"));
///
/// root.push_state("Idle").unwrap();
/// root.update(0.5).unwrap(); // Idle's condition moves the machine on
/// root.update(0.5).unwrap();
///
/// assert_eq!(root.active_path(), vec!["root", "Moving"]);
/// assert_eq!(ticks.get(), 0.5);
/// ```
#[derive(Clone)]
pub struct StateNode {
    inner: Rc<NodeInner>,
}

/// Non-owning handle to a [`StateNode`].
#[derive(Clone)]
pub struct WeakStateNode {
    inner: Weak<NodeInner>,
}

impl WeakStateNode {
    /// Get the node back, failing if the tree has been dropped.
    pub fn upgrade(&self) -> Result<StateNode, StateError> {
        self.inner
            .upgrade()
            .map(|inner| StateNode { inner })
            .ok_or(StateError::NodeDropped)
    }
}

impl fmt::Debug for WeakStateNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakStateNode")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl Default for StateNode {
    fn default() -> Self {
        Self::new()
    }
}

impl StateNode {
    /// Create a detached node with the default configuration.
    pub fn new() -> Self {
        Self::with_config(NodeConfig::default())
    }

    /// Create a detached node with its own configuration.
    pub fn with_config(config: NodeConfig) -> Self {
        let history = TransitionHistory::with_capacity(config.history_capacity);
        StateNode {
            inner: Rc::new(NodeInner {
                name: OnceCell::new(),
                parent: OnceCell::new(),
                config,
                children: RefCell::new(HashMap::new()),
                active: RefCell::new(Vec::new()),
                events: RefCell::new(HashMap::new()),
                conditions: RefCell::new(Rc::new(Vec::new())),
                on_enter: RefCell::new(None),
                on_exit: RefCell::new(None),
                on_update: RefCell::new(None),
                history: RefCell::new(history),
            }),
        }
    }

    /// Non-owning handle for callbacks that drive this node.
    pub fn downgrade(&self) -> WeakStateNode {
        WeakStateNode {
            inner: Rc::downgrade(&self.inner),
        }
    }

    // ---------------------------------------------------------------------
    // Registration
    // ---------------------------------------------------------------------

    /// Register `node` as a child under `name` and make this node its parent.
    ///
    /// Fails if `name` is taken, if `node` already has a parent, or if
    /// `node` is this node or one of its ancestors.
    pub fn add_child(&self, name: impl Into<String>, node: StateNode) -> Result<(), StateError> {
        let name = name.into();

        if self.inner.children.borrow().contains_key(&name) {
            return Err(self.reject(StateError::DuplicateName { name }));
        }
        if node.inner.parent.get().is_some() {
            return Err(self.reject(StateError::AlreadyAttached { name }));
        }
        if self.has_ancestor_or_self(&node) {
            return Err(self.reject(StateError::CyclicChild { name }));
        }

        // Both cells are empty: parent was checked above and a node gets its
        // name only together with its parent.
        let _ = node.inner.parent.set(Rc::downgrade(&self.inner));
        let _ = node.inner.name.set(name.clone());

        debug!(node = self.label(), child = %name, "registered child state");
        self.inner.children.borrow_mut().insert(name, node);
        Ok(())
    }

    /// Set the hook run when this node is pushed onto its parent's stack.
    pub fn set_enter_action<F>(&self, action: F)
    where
        F: Fn() + 'static,
    {
        *self.inner.on_enter.borrow_mut() = Some(Rc::new(action));
    }

    /// Set the hook run when this node is popped from its parent's stack.
    pub fn set_exit_action<F>(&self, action: F)
    where
        F: Fn() + 'static,
    {
        *self.inner.on_exit.borrow_mut() = Some(Rc::new(action));
    }

    /// Set the hook run on every update while this node is the active leaf.
    pub fn set_update_action<F>(&self, action: F)
    where
        F: Fn(f32) + 'static,
    {
        *self.inner.on_update.borrow_mut() = Some(Rc::new(action));
    }

    /// Register a handler for `id` that receives the raw payload.
    pub fn set_event<F>(&self, id: impl Into<String>, handler: F) -> Result<(), StateError>
    where
        F: Fn(&dyn Any) -> Result<(), StateError> + 'static,
    {
        self.insert_event(id.into(), event::untyped(handler))
    }

    /// Register a handler for `id` whose payload is cast to `T` at dispatch.
    ///
    /// Triggering `id` with a payload of another type fails with
    /// [`StateError::PayloadMismatch`] without running `handler`.
    pub fn set_typed_event<T, F>(&self, id: impl Into<String>, handler: F) -> Result<(), StateError>
    where
        T: Any,
        F: Fn(&T) -> Result<(), StateError> + 'static,
    {
        let id = id.into();
        let handler = event::typed(&id, handler);
        self.insert_event(id, handler)
    }

    fn insert_event(&self, id: String, handler: EventHandler) -> Result<(), StateError> {
        let mut events = self.inner.events.borrow_mut();
        if events.contains_key(&id) {
            drop(events);
            return Err(self.reject(StateError::DuplicateEvent { id }));
        }
        events.insert(id, handler);
        Ok(())
    }

    /// Append a condition evaluated on every update while this node is the
    /// active leaf. `action` runs whenever `predicate` returns true.
    pub fn add_condition<P, A>(&self, predicate: P, action: A)
    where
        P: Fn() -> bool + 'static,
        A: Fn() -> Result<(), StateError> + 'static,
    {
        self.push_condition(Condition::new(predicate, Some(Box::new(action))));
    }

    /// Append a condition with no action. The predicate is still polled.
    pub fn add_check<P>(&self, predicate: P)
    where
        P: Fn() -> bool + 'static,
    {
        self.push_condition(Condition::new(predicate, None));
    }

    fn push_condition(&self, condition: Condition) {
        let mut conditions = self.inner.conditions.borrow_mut();
        // Copies the list only while an update is iterating over it.
        Rc::make_mut(&mut conditions).push(Rc::new(condition));
    }

    // ---------------------------------------------------------------------
    // Transitions
    // ---------------------------------------------------------------------

    /// Push the child `name` onto the active stack and enter it.
    ///
    /// Whatever was on top stays on the stack and is not exited.
    pub fn push_state(&self, name: &str) -> Result<(), StateError> {
        let child = self.lookup(name)?;
        let from = self.top_label();

        self.inner.active.borrow_mut().push(child.clone());
        debug!(node = self.label(), state = name, "push state");
        self.record(TransitionKind::Push, from, Some(name.to_string()));

        child.enter();
        Ok(())
    }

    /// Pop the top of the active stack and exit it.
    pub fn pop_state(&self) -> Result<(), StateError> {
        let popped = self.inner.active.borrow_mut().pop();
        let Some(popped) = popped else {
            return Err(self.reject(StateError::EmptyStack));
        };

        debug!(node = self.label(), state = popped.label(), "pop state");
        self.record(
            TransitionKind::Pop,
            Some(popped.label().to_string()),
            self.top_label(),
        );

        popped.exit();
        Ok(())
    }

    /// Validate that `name` is a registered child, then pop the top of the
    /// active stack.
    ///
    /// The popped entry is whatever is on top, even if it is not `name`.
    pub fn pop_state_named(&self, name: &str) -> Result<(), StateError> {
        self.lookup(name)?;
        self.pop_state()
    }

    /// Replace the top of the active stack with the child `name`.
    ///
    /// The previous top, if any, is exited before `name` is entered. On an
    /// empty stack this behaves like [`push_state`](Self::push_state).
    pub fn change_state(&self, name: &str) -> Result<(), StateError> {
        let child = self.lookup(name)?;

        let previous = self.inner.active.borrow_mut().pop();
        let from = previous.as_ref().map(|node| node.label().to_string());
        if let Some(previous) = previous {
            previous.exit();
        }

        self.inner.active.borrow_mut().push(child.clone());
        debug!(
            node = self.label(),
            from = from.as_deref().unwrap_or("-"),
            to = name,
            "change state"
        );
        self.record(TransitionKind::Change, from, Some(name.to_string()));

        child.enter();
        Ok(())
    }

    fn enter(&self) {
        let hook = self.inner.on_enter.borrow().clone();
        if let Some(hook) = hook {
            hook();
        }
    }

    fn exit(&self) {
        let hook = self.inner.on_exit.borrow().clone();
        if let Some(hook) = hook {
            hook();
        }
    }

    // ---------------------------------------------------------------------
    // Runtime
    // ---------------------------------------------------------------------

    /// Advance the machine by `dt`.
    ///
    /// Delegates to the top of the active stack if there is one. Otherwise
    /// this node is the active leaf: its update hook runs, then every
    /// condition is evaluated in registration order and the action of each
    /// one that holds is run immediately.
    ///
    /// The conditions evaluated are those registered when the loop started,
    /// and a transition fired by one action does not stop the loop. The
    /// first action error aborts the remaining conditions and is returned.
    pub fn update(&self, dt: f32) -> Result<(), StateError> {
        if let Some(top) = self.active_child() {
            trace!(node = self.label(), child = top.label(), "delegating update");
            return top.update(dt);
        }

        let hook = self.inner.on_update.borrow().clone();
        if let Some(hook) = hook {
            hook(dt);
        }

        let conditions = self.inner.conditions.borrow().clone();
        for condition in conditions.iter() {
            if condition.check() {
                condition.fire()?;
            }
        }
        Ok(())
    }

    /// Dispatch `id` with an empty payload to the active leaf.
    pub fn trigger_event(&self, id: &str) -> Result<(), StateError> {
        self.trigger_event_with(id, &())
    }

    /// Dispatch `id` with `payload` to the active leaf.
    pub fn trigger_event_with(&self, id: &str, payload: &dyn Any) -> Result<(), StateError> {
        if let Some(top) = self.active_child() {
            trace!(node = self.label(), child = top.label(), event = id, "routing event");
            return top.trigger_event_with(id, payload);
        }

        let handler = self.inner.events.borrow().get(id).cloned();
        match handler {
            Some(handler) => {
                trace!(node = self.label(), event = id, "handling event");
                handler(payload)
            }
            None => Err(self.reject(StateError::UnknownEvent { id: id.to_string() })),
        }
    }

    // ---------------------------------------------------------------------
    // Introspection
    // ---------------------------------------------------------------------

    /// Name this node was registered under, or [`ROOT_LABEL`].
    pub fn label(&self) -> &str {
        self.inner.name.get().map_or(ROOT_LABEL, String::as_str)
    }

    /// Name this node was registered under, if it has a parent.
    pub fn name(&self) -> Option<&str> {
        self.inner.name.get().map(String::as_str)
    }

    /// Node this one was registered under, if it is still alive.
    pub fn parent(&self) -> Option<StateNode> {
        self.inner
            .parent
            .get()
            .and_then(Weak::upgrade)
            .map(|inner| StateNode { inner })
    }

    /// Child registered under `name`.
    pub fn child(&self, name: &str) -> Option<StateNode> {
        self.inner.children.borrow().get(name).cloned()
    }

    /// Registered child names, sorted.
    pub fn child_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.children.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    /// Whether this node itself handles `id`.
    pub fn has_event(&self, id: &str) -> bool {
        self.inner.events.borrow().contains_key(id)
    }

    /// Registered event ids, sorted.
    pub fn event_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.inner.events.borrow().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Number of registered conditions, with or without actions.
    pub fn condition_count(&self) -> usize {
        self.inner.conditions.borrow().len()
    }

    /// Number of entries on the active stack.
    pub fn stack_depth(&self) -> usize {
        self.inner.active.borrow().len()
    }

    /// Labels of the active stack, bottom first.
    pub fn stack_labels(&self) -> Vec<String> {
        self.inner
            .active
            .borrow()
            .iter()
            .map(|node| node.label().to_string())
            .collect()
    }

    /// Top of the active stack.
    pub fn active_child(&self) -> Option<StateNode> {
        self.inner.active.borrow().last().cloned()
    }

    /// The node reached by following the top of every active stack.
    pub fn active_leaf(&self) -> StateNode {
        let mut node = self.clone();
        while let Some(next) = node.active_child() {
            node = next;
        }
        node
    }

    /// Labels from this node down to the active leaf, inclusive.
    pub fn active_path(&self) -> Vec<String> {
        let mut path = vec![self.label().to_string()];
        let mut node = self.clone();
        while let Some(next) = node.active_child() {
            path.push(next.label().to_string());
            node = next;
        }
        path
    }

    /// Whether this node is the active leaf of its own subtree.
    pub fn is_leaf_active(&self) -> bool {
        self.inner.active.borrow().is_empty()
    }

    /// Configuration the node was created with.
    pub fn config(&self) -> &NodeConfig {
        &self.inner.config
    }

    /// Copy of the transitions applied to this node's active stack.
    pub fn history(&self) -> TransitionHistory {
        self.inner.history.borrow().clone()
    }

    /// Forget recorded transitions.
    pub fn clear_history(&self) {
        self.inner.history.borrow_mut().clear();
    }

    // ---------------------------------------------------------------------
    // Helpers
    // ---------------------------------------------------------------------

    fn lookup(&self, name: &str) -> Result<StateNode, StateError> {
        self.child(name).ok_or_else(|| {
            self.reject(StateError::UnknownState {
                name: name.to_string(),
            })
        })
    }

    fn top_label(&self) -> Option<String> {
        self.inner
            .active
            .borrow()
            .last()
            .map(|node| node.label().to_string())
    }

    fn record(&self, kind: TransitionKind, from: Option<String>, to: Option<String>) {
        self.inner
            .history
            .borrow_mut()
            .record(TransitionRecord::new(kind, from, to));
    }

    fn reject(&self, error: StateError) -> StateError {
        warn!(node = self.label(), %error, "state call rejected");
        error
    }

    fn has_ancestor_or_self(&self, candidate: &StateNode) -> bool {
        let mut current = Some(self.clone());
        while let Some(node) = current {
            if node == *candidate {
                return true;
            }
            current = node.parent();
        }
        false
    }
}

impl PartialEq for StateNode {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for StateNode {}

impl fmt::Debug for StateNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateNode")
            .field("label", &self.label())
            .field("children", &self.child_names())
            .field("stack", &self.stack_labels())
            .finish()
    }
}
