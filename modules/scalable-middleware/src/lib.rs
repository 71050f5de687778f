//! The action pipeline around the fragment reducers: middlewares that resolve
//! callable and deferred payloads, the pending-action tracker, and action
//! creators.
//!
//! A host wires these as
//!
//! ```text
//! dispatch -> FunctionMiddleware -> PromiseMiddleware -> root reducer
//! ```
//!
//! with [`apply_middleware`], and mounts a [`LoadingTracker`] next to the
//! fragment families in its root reducer.

pub mod action_creator;
pub mod configure;
pub mod function;
pub mod loading;
pub mod promise;
pub mod traits;

pub use action_creator::{make_action_creator, ActionCreator};
pub use configure::apply_key_paths;
pub use function::FunctionMiddleware;
pub use loading::{loading_reducer, LoadingTracker};
pub use promise::{ErrorDescriptor, PromiseMiddleware};
pub use traits::{apply_middleware, Middleware, Next, StoreApi};
