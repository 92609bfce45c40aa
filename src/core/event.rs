//! Event handlers and payload casting.

use super::error::StateError;
use std::any::{type_name, Any};
use std::rc::Rc;

/// Handler stored in a node's event table.
pub(crate) type EventHandler = Rc<dyn Fn(&dyn Any) -> Result<(), StateError>>;

/// Wrap a handler that inspects the raw payload itself.
pub(crate) fn untyped<F>(handler: F) -> EventHandler
where
    F: Fn(&dyn Any) -> Result<(), StateError> + 'static,
{
    Rc::new(handler)
}

/// Wrap a handler expecting a payload of type `T`.
///
/// A payload of any other type fails with [`StateError::PayloadMismatch`]
/// before `handler` runs.
pub(crate) fn typed<T, F>(id: &str, handler: F) -> EventHandler
where
    T: Any,
    F: Fn(&T) -> Result<(), StateError> + 'static,
{
    let id = id.to_string();
    Rc::new(move |payload: &dyn Any| match payload.downcast_ref::<T>() {
        Some(args) => handler(args),
        None => Err(StateError::PayloadMismatch {
            id: id.clone(),
            expected: type_name::<T>(),
        }),
    })
}
