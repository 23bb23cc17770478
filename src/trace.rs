use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

pub const TRACE_ENV: &str = "SOLITAIRE_CHECK_TRACE";

static VERBOSE: OnceLock<bool> = OnceLock::new();

/// `SOLITAIRE_CHECK_TRACE=1` (or `true`) turns on debug output for this crate.
pub fn verbose() -> bool {
    *VERBOSE.get_or_init(|| {
        std::env::var(TRACE_ENV)
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    })
}

fn filter() -> EnvFilter {
    if verbose() {
        return EnvFilter::new("solitaire_check=debug");
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Installs the stderr subscriber. Safe to call more than once.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
