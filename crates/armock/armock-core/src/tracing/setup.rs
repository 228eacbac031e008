//! Subscriber setup shared by test suites and tools embedding armock.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_ENV: &str = "ARMOCK_LOG";

/// Matches every `armock_*` target.
const DEFAULT_DIRECTIVES: &str = "armock=info";

/// Filter read from `ARMOCK_LOG`, e.g. `armock_analysis=debug,armock_synth=warn`.
///
/// An unset or unparsable variable yields `armock=info`.
pub fn log_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Install a compact fmt subscriber that writes through the test harness capture.
///
/// Meant to be called at the top of every test that builds a `Mocker`. Only
/// the first call in a process does anything, and a global subscriber set up
/// by someone else is left in place.
pub fn init_tracing() {
    static INSTALLED: Once = Once::new();
    INSTALLED.call_once(|| {
        let layer = fmt::layer().compact().with_target(true).with_test_writer();
        if tracing_subscriber::registry()
            .with(layer)
            .with(log_filter())
            .try_init()
            .is_err()
        {
            tracing::debug!("global subscriber already installed, keeping it");
        }
    });
}
