//! Actions and their payloads.
//!
//! A payload is decided when the action is built: an immediate value, a
//! deferred result that settles later, or a callable that produces the
//! payload from the action's parameters and the current host state. Reducers
//! only ever look at immediate payloads; the middlewares resolve the other two.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use serde::{Deserialize, Serialize};

use crate::value::{Map, Value};

pub const PROMISE_LOADING_STATUS: &str = "redux-scalable/promise-middleware/PROMISE_LOADING_STATUS";
pub const PROMISE_SUCCESS_STATUS: &str = "redux-scalable/promise-middleware/PROMISE_SUCCESS_STATUS";
pub const PROMISE_ERROR_STATUS: &str = "redux-scalable/promise-middleware/PROMISE_ERROR_STATUS";

/// Lifecycle of a deferred payload, as recorded in `meta.promiseStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PromiseStatus {
    #[serde(rename = "redux-scalable/promise-middleware/PROMISE_LOADING_STATUS")]
    Loading,
    #[serde(rename = "redux-scalable/promise-middleware/PROMISE_SUCCESS_STATUS")]
    Success,
    #[serde(rename = "redux-scalable/promise-middleware/PROMISE_ERROR_STATUS")]
    Error,
}

impl PromiseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PromiseStatus::Loading => PROMISE_LOADING_STATUS,
            PromiseStatus::Success => PROMISE_SUCCESS_STATUS,
            PromiseStatus::Error => PROMISE_ERROR_STATUS,
        }
    }

    /// Whether this status ends a deferred payload's lifecycle.
    pub fn is_settled(&self) -> bool {
        !matches!(self, PromiseStatus::Loading)
    }
}

impl fmt::Display for PromiseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action metadata. Known fields are typed; everything else the caller puts
/// in `meta` lives in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_parameters: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promise_status: Option<PromiseStatus>,
    #[serde(flatten)]
    pub extra: Map,
}

impl Meta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn with_action_parameters(mut self, parameters: Vec<Value>) -> Self {
        self.action_parameters = Some(parameters);
        self
    }

    pub fn with_promise_status(mut self, status: PromiseStatus) -> Self {
        self.promise_status = Some(status);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

/// Why a deferred payload failed.
#[derive(Debug, Clone)]
pub enum Rejection {
    /// An error. Serialized to `{name, message, stack}` before dispatch.
    Error(Arc<anyhow::Error>),
    /// A plain value, forwarded as the payload unchanged.
    Value(Value),
}

impl Rejection {
    pub fn error(error: impl Into<anyhow::Error>) -> Self {
        Rejection::Error(Arc::new(error.into()))
    }

    pub fn value(value: impl Into<Value>) -> Self {
        Rejection::Value(value.into())
    }
}

impl From<anyhow::Error> for Rejection {
    fn from(error: anyhow::Error) -> Self {
        Rejection::Error(Arc::new(error))
    }
}

pub type DeferredResult = Result<Value, Rejection>;

/// A payload that settles later. Shared, so every clone of the action
/// observes the same outcome.
#[derive(Clone)]
pub struct Deferred(Shared<BoxFuture<'static, DeferredResult>>);

impl Deferred {
    pub fn new(future: impl Future<Output = DeferredResult> + Send + 'static) -> Self {
        Self(future.boxed().shared())
    }

    /// The shared future. Await it to get the settled payload.
    pub fn settled(&self) -> Shared<BoxFuture<'static, DeferredResult>> {
        self.0.clone()
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Deferred").finish_non_exhaustive()
    }
}

type CallableFn = dyn Fn(&[Value], &Value) -> Payload + Send + Sync;

/// A payload computed from `(meta.actionParameters, host state)`.
#[derive(Clone)]
pub struct Callable(Arc<CallableFn>);

impl Callable {
    pub fn new(f: impl Fn(&[Value], &Value) -> Payload + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn call(&self, parameters: &[Value], state: &Value) -> Payload {
        (self.0)(parameters, state)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Callable").finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub enum Payload {
    Immediate(Value),
    Deferred(Deferred),
    Callable(Callable),
}

impl Default for Payload {
    fn default() -> Self {
        Payload::Immediate(Value::Null)
    }
}

impl Payload {
    pub fn immediate(value: impl Into<Value>) -> Self {
        Payload::Immediate(value.into())
    }

    pub fn deferred(future: impl Future<Output = DeferredResult> + Send + 'static) -> Self {
        Payload::Deferred(Deferred::new(future))
    }

    pub fn callable(f: impl Fn(&[Value], &Value) -> Payload + Send + Sync + 'static) -> Self {
        Payload::Callable(Callable::new(f))
    }

    /// `{ fragments: [...] }`, the shape every fragment family reads.
    pub fn with_fragments(fragments: impl IntoIterator<Item = Value>) -> Self {
        let mut fields = Map::new();
        fields.insert("fragments".into(), fragments.into_iter().collect());
        Payload::Immediate(Value::from(fields))
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Payload::Immediate(value) => Some(value),
            _ => None,
        }
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Immediate(value)
    }
}

#[derive(Debug, Clone)]
pub struct Action {
    pub action_type: String,
    pub meta: Meta,
    pub payload: Payload,
}

impl Action {
    pub fn new(action_type: impl Into<String>) -> Self {
        Self {
            action_type: action_type.into(),
            meta: Meta::default(),
            payload: Payload::default(),
        }
    }

    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    pub fn with_payload(mut self, payload: impl Into<Payload>) -> Self {
        self.payload = payload.into();
        self
    }

    pub fn with_fragments(self, fragments: impl IntoIterator<Item = Value>) -> Self {
        self.with_payload(Payload::with_fragments(fragments))
    }

    /// `payload.fragments`, when the payload is resolved and carries an array
    /// there. Anything else means the action has no fragments.
    pub fn fragments(&self) -> Option<&[Value]> {
        self.payload.as_value()?.get("fragments")?.as_array()
    }

    pub fn promise_status(&self) -> Option<PromiseStatus> {
        self.meta.promise_status
    }
}
