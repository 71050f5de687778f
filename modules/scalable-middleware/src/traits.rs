//! Middleware seams between the host store and the action pipeline.

use std::sync::Arc;

use scalable_state::{Action, Value};

/// The rest of the pipeline after a middleware. Calling it hands the action
/// on; not calling it drops the action.
pub type Next = Arc<dyn Fn(Action) + Send + Sync>;

/// What a middleware may ask of the host store.
///
/// Implemented by the host; tests use an in-memory store.
pub trait StoreApi: Send + Sync {
    /// The current root state.
    fn state(&self) -> Value;
}

/// Sees every dispatched action before the reducers do.
///
/// A middleware either forwards the action (possibly rewritten) through
/// `next`, forwards other actions instead, or keeps `next` to forward later.
pub trait Middleware: Send + Sync {
    fn handle(&self, store: &Arc<dyn StoreApi>, action: Action, next: &Next);
}

/// Chain `middlewares` in front of `base`. The first middleware sees each
/// action first; `base` (usually the host's reducer step) sees it last.
pub fn apply_middleware(
    store: Arc<dyn StoreApi>,
    middlewares: Vec<Arc<dyn Middleware>>,
    base: Next,
) -> Next {
    middlewares.into_iter().rev().fold(base, |next, middleware| {
        let store = Arc::clone(&store);
        let chained: Next = Arc::new(move |action: Action| middleware.handle(&store, action, &next));
        chained
    })
}
