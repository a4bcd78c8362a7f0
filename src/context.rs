//! Ambient per-thread context consulted by the layout.
//!
//! Application code populates this store around its work (request ids,
//! user ids, tenant names); the layer snapshots it when an event fires
//! and the layout resolves `%X{key}` placeholders against the snapshot.
//! The store is strictly per-thread; nothing crosses thread boundaries.

use std::cell::RefCell;
use std::collections::BTreeMap;

thread_local! {
    static CONTEXT: RefCell<BTreeMap<String, String>> = RefCell::new(BTreeMap::new());
}

/// Put a key/value pair into the current thread's context, returning the
/// previous value for the key, if any.
pub fn insert(key: impl Into<String>, value: impl Into<String>) -> Option<String> {
    CONTEXT.with(|ctx| ctx.borrow_mut().insert(key.into(), value.into()))
}

/// Remove a key from the current thread's context.
pub fn remove(key: &str) -> Option<String> {
    CONTEXT.with(|ctx| ctx.borrow_mut().remove(key))
}

/// Drop every entry in the current thread's context.
pub fn clear() {
    CONTEXT.with(|ctx| ctx.borrow_mut().clear());
}

/// Copy of the current thread's context, suitable for
/// [`LayoutEvent::context`](crate::record::LayoutEvent).
pub fn snapshot() -> BTreeMap<String, String> {
    CONTEXT.with(|ctx| ctx.borrow().clone())
}

/// Set a key for the lifetime of the returned guard.
///
/// When the guard is dropped the previous value for the key is restored,
/// or the key removed if there was none. This is the usual way to scope
/// context to a request or unit of work.
pub fn scoped(key: impl Into<String>, value: impl Into<String>) -> ContextGuard {
    let key = key.into();
    let previous = insert(key.clone(), value);
    ContextGuard { key, previous }
}

/// RAII guard returned by [`scoped`]; restores the shadowed value on drop.
pub struct ContextGuard {
    key: String,
    previous: Option<String>,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        match self.previous.take() {
            Some(value) => {
                insert(std::mem::take(&mut self.key), value);
            }
            None => {
                remove(&self.key);
            }
        }
    }
}
