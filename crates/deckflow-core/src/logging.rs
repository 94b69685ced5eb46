#![forbid(unsafe_code)]

//! Structured logging helpers.
//!
//! With the `tracing` feature the standard `tracing` macros are re-exported
//! here (and at the crate root). With `tracing-json`,
//! [`init_json_logging`] installs a JSON subscriber filtered by `RUST_LOG`,
//! suitable for hosts that ship engine logs to a collector.

#[cfg(feature = "tracing")]
pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "deckflow_core=info,deckflow_layout=info,deckflow_widgets=info";

/// Install a global JSON subscriber.
///
/// Returns `false` if a global subscriber was already installed.
#[cfg(feature = "tracing-json")]
pub fn init_json_logging() -> bool {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}
