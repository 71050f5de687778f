use std::sync::Arc;

use scalable_state::{Action, Payload};
use tracing::debug;

use crate::traits::{Middleware, Next, StoreApi};

/// Resolves callable payloads before the rest of the pipeline sees them.
///
/// The callable receives `meta.action_parameters` (empty when unset) and the
/// current host state. Its result replaces the payload and may itself be
/// deferred, for a promise middleware further down the chain.
#[derive(Debug, Default, Clone, Copy)]
pub struct FunctionMiddleware;

impl Middleware for FunctionMiddleware {
    fn handle(&self, store: &Arc<dyn StoreApi>, action: Action, next: &Next) {
        let Payload::Callable(callable) = action.payload.clone() else {
            return next(action);
        };

        let parameters = action.meta.action_parameters.as_deref().unwrap_or_default();
        let payload = callable.call(parameters, &store.state());
        debug!(
            action_type = %action.action_type,
            parameters = parameters.len(),
            "Resolved callable payload"
        );
        next(Action { payload, ..action });
    }
}
