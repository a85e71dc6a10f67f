//! Logging setup.
//!
//! Logs go to stderr so report output on stdout stays machine-readable.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing with defaults.
///
/// Sets up tracing-subscriber with:
/// - Environment filter (RUST_LOG), falling back to `warn`
/// - Compact format on stderr
pub fn init() {
    init_with_filter("warn");
}

/// Initialize tracing with a custom default filter.
///
/// `RUST_LOG` still wins when set. Safe to call more than once; later calls
/// are ignored.
pub fn init_with_filter(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_init_does_not_panic() {
        init();
        init_with_filter("debug");
    }
}
