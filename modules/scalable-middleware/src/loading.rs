//! Which action types have a deferred payload still pending.
//!
//! The slice is a list of action types, one entry per pending action: a
//! loading action appends its type, a settled action removes one entry of
//! its type.

use std::sync::Arc;

use arc_swap::ArcSwap;
use scalable_state::{Action, KeyPath, PromiseStatus, Reducer, Selector, Value};
use tracing::debug;

/// Update the pending list for one action. Actions without a promise status
/// return `state` itself.
pub fn loading_reducer(state: Option<Value>, action: &Action) -> Value {
    let mut pending = match state {
        Some(list @ Value::Array(_)) => list,
        _ => Value::empty_array(),
    };
    let Some(status) = action.promise_status() else {
        return pending;
    };

    let action_type = Value::from(action.action_type.as_str());
    if status == PromiseStatus::Loading {
        if let Some(items) = pending.as_array_mut() {
            items.push(action_type);
        }
        return pending;
    }

    let position = pending
        .as_array()
        .and_then(|items| items.iter().position(|item| *item == action_type));
    match position {
        Some(index) => {
            if let Some(items) = pending.as_array_mut() {
                items.remove(index);
            }
        }
        None => debug!(
            action_type = %action.action_type,
            status = %status,
            "Settled action was not pending"
        ),
    }
    pending
}

/// The loading slice reducer plus selectors that find the slice through a
/// configurable key path. Clones share the key path.
#[derive(Clone, Default)]
pub struct LoadingTracker {
    key_path: Arc<ArcSwap<KeyPath>>,
}

impl LoadingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_key_path(&self, key_path: impl Into<KeyPath>) {
        let key_path = key_path.into();
        debug!(key_path = %key_path, "Loading key path set");
        self.key_path.store(Arc::new(key_path));
    }

    pub fn key_path(&self) -> KeyPath {
        self.key_path.load().as_ref().clone()
    }

    /// Selects `true` while an action of `action_type` is pending. `false`
    /// when nothing list-shaped is mounted at the key path.
    pub fn make_select_loading(&self, action_type: impl Into<String>) -> Selector {
        let key_path = Arc::clone(&self.key_path);
        let action_type = Value::from(action_type.into());
        Selector::new(move |root| {
            let pending = key_path
                .load()
                .resolve(root)
                .and_then(Value::as_array)
                .is_some_and(|items| items.contains(&action_type));
            Value::from(pending)
        })
    }
}

impl Reducer for LoadingTracker {
    fn reduce(&self, state: Option<Value>, action: &Action) -> Value {
        loading_reducer(state, action)
    }
}
