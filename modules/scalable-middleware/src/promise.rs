//! Deferred payload resolution.
//!
//! For an action whose payload is [`Payload::Deferred`], the pipeline sees
//! two actions with the same type and meta:
//!
//! 1. right away, a loading action (`promise_status = Loading`, payload null);
//! 2. once the payload settles, a success action carrying the value, or an
//!    error action carrying the rejection.
//!
//! Error rejections are turned into an [`ErrorDescriptor`]; value rejections
//! are forwarded as they are.

use std::sync::Arc;

use scalable_common::ScalableError;
use scalable_state::{Action, Map, Payload, PromiseStatus, Rejection, Value};
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use crate::traits::{Middleware, Next, StoreApi};

/// Transportable form of an error rejection: `{name, message, stack}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDescriptor {
    pub name: String,
    pub message: String,
    /// The full error chain.
    pub stack: String,
}

impl ErrorDescriptor {
    pub fn from_error(error: &anyhow::Error) -> Self {
        Self {
            name: "Error".to_string(),
            message: error.to_string(),
            stack: format!("{error:?}"),
        }
    }
}

impl From<ErrorDescriptor> for Value {
    fn from(descriptor: ErrorDescriptor) -> Self {
        let mut fields = Map::new();
        fields.insert("name".into(), Value::from(descriptor.name));
        fields.insert("message".into(), Value::from(descriptor.message));
        fields.insert("stack".into(), Value::from(descriptor.stack));
        Value::from(fields)
    }
}

/// Forwards deferred payloads as loading/settled action pairs. Settlement
/// runs as a task on the given tokio runtime.
#[derive(Debug, Clone)]
pub struct PromiseMiddleware {
    runtime: Handle,
}

impl PromiseMiddleware {
    pub fn new(runtime: Handle) -> Self {
        Self { runtime }
    }

    /// Use the runtime the caller is running on.
    pub fn from_current() -> Result<Self, ScalableError> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|e| ScalableError::Runtime(e.to_string()))
    }
}

impl Middleware for PromiseMiddleware {
    fn handle(&self, _store: &Arc<dyn StoreApi>, action: Action, next: &Next) {
        let Payload::Deferred(deferred) = action.payload.clone() else {
            return next(action);
        };

        let Action {
            action_type, meta, ..
        } = action;
        let loading = Action::new(action_type.clone())
            .with_meta(meta.clone().with_promise_status(PromiseStatus::Loading));
        debug!(action_type = %action_type, "Deferred payload pending");
        next(loading);

        let next = Arc::clone(next);
        self.runtime.spawn(async move {
            let (status, payload) = match deferred.settled().await {
                Ok(value) => (PromiseStatus::Success, value),
                Err(Rejection::Error(error)) => {
                    warn!(action_type = %action_type, error = %error, "Deferred payload failed");
                    (
                        PromiseStatus::Error,
                        Value::from(ErrorDescriptor::from_error(&error)),
                    )
                }
                Err(Rejection::Value(value)) => (PromiseStatus::Error, value),
            };
            info!(action_type = %action_type, status = %status, "Deferred payload settled");
            next(
                Action::new(action_type)
                    .with_meta(meta.with_promise_status(status))
                    .with_payload(payload),
            );
        });
    }
}
