//! Reducers: pure `(state, action) -> state` functions.

use std::sync::Arc;

use crate::action::Action;
use crate::value::{Map, Value};

/// Pure state updates. No I/O, no side effects.
///
/// `state` is `None` when the host has nothing stored for this reducer yet;
/// the reducer then starts from its own initial state.
pub trait Reducer: Send + Sync {
    fn reduce(&self, state: Option<Value>, action: &Action) -> Value;
}

impl<R: Reducer + ?Sized> Reducer for Arc<R> {
    fn reduce(&self, state: Option<Value>, action: &Action) -> Value {
        (**self).reduce(state, action)
    }
}

/// A reducer backed by a closure.
pub struct FnReducer<F>(F);

pub fn reducer_fn<F>(f: F) -> FnReducer<F>
where
    F: Fn(Option<Value>, &Action) -> Value + Send + Sync,
{
    FnReducer(f)
}

impl<F> Reducer for FnReducer<F>
where
    F: Fn(Option<Value>, &Action) -> Value + Send + Sync,
{
    fn reduce(&self, state: Option<Value>, action: &Action) -> Value {
        (self.0)(state, action)
    }
}

/// Mounts reducers under keys of an object state.
///
/// Every action reaches every slice. When no slice changes (by
/// [`Value::same`]), the previous root is returned as is, so selectors over
/// it stay cached.
#[derive(Default)]
pub struct CombinedReducer {
    slices: Vec<(String, Box<dyn Reducer>)>,
}

impl CombinedReducer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, reducer: impl Reducer + 'static) -> Self {
        self.slices.push((key.into(), Box::new(reducer)));
        self
    }
}

impl Reducer for CombinedReducer {
    fn reduce(&self, state: Option<Value>, action: &Action) -> Value {
        let mut root = state.unwrap_or_else(Value::empty_object);
        if root.as_object().is_none() {
            root = Value::empty_object();
        }

        let mut changed: Vec<(&str, Value)> = Vec::new();
        for (key, reducer) in &self.slices {
            let previous = root.get(key).cloned();
            let next = reducer.reduce(previous.clone(), action);
            if !previous.is_some_and(|previous| previous.same(&next)) {
                changed.push((key.as_str(), next));
            }
        }

        if changed.is_empty() {
            return root;
        }
        if let Some(fields) = root.as_object_mut() {
            for (key, next) in changed {
                fields.insert(key.to_string(), next);
            }
        }
        root
    }
}

/// Build an object from `(key, value)` pairs. Handy for seeding host state.
pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Value {
    Value::from(
        entries
            .into_iter()
            .map(|(key, value)| (key.into(), value))
            .collect::<Map>(),
    )
}
