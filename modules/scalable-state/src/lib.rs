//! Fragment-based state extensions for a unidirectional-dispatch store.
//!
//! One dispatched [`Action`] can carry many typed fragments in
//! `payload.fragments`. Each fragment family built with
//! [`define_action_fragment`] reduces only its own fragments into its own
//! slice of the host state, wherever that slice is mounted ([`KeyPath`]), and
//! exposes memoized [`Selector`]s over it.
//!
//! Two families ship with the crate: [`inject()`], a deep keyed value store,
//! and [`entity()`], normalized paginated collections.

pub mod action;
pub mod entity;
pub mod fragment;
pub mod inject;
pub mod key_path;
pub mod reducer;
pub mod selector;
pub mod value;

pub use action::{
    Action, Callable, Deferred, DeferredResult, Meta, Payload, PromiseStatus, Rejection,
    PROMISE_ERROR_STATUS, PROMISE_LOADING_STATUS, PROMISE_SUCCESS_STATUS,
};
pub use entity::{entity, Entity, EntityFamily, EntityFragment, DEFAULT_GROUP};
pub use fragment::{define_action_fragment, fragment_type, ActionFragment, FragmentDefinition};
pub use inject::{inject, Inject, InjectFamily, InjectFragment};
pub use key_path::{KeyPath, KeySegment, MAX_ARRAY_INDEX};
pub use reducer::{object, reducer_fn, CombinedReducer, FnReducer, Reducer};
pub use selector::{SelectArg, Selector};
pub use value::{Map, Value};
