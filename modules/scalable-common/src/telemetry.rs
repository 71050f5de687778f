use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use crate::error::ScalableError;

/// Install a `fmt` subscriber filtered by `RUST_LOG`, with `default_directive`
/// (e.g. `"scalable=info"`) added on top.
///
/// Fails if a global subscriber is already set, so callers that may run more
/// than once (tests) should ignore the error.
pub fn init_tracing(default_directive: &str) -> Result<(), ScalableError> {
    let directive: Directive = default_directive.parse().map_err(|e| {
        ScalableError::Telemetry(format!("invalid directive {default_directive:?}: {e}"))
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .try_init()
        .map_err(|e| ScalableError::Telemetry(e.to_string()))
}
