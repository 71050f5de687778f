//! Ambient pieces shared by the fragment crates: the error type,
//! configuration of slice key paths, and tracing setup.

pub mod config;
pub mod error;
pub mod telemetry;

pub use config::{load_config, Config, KeyPathConfig};
pub use error::ScalableError;
pub use telemetry::init_tracing;
