pub mod build_info;
pub mod paths;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Installs the global tracing subscriber. Logs go to stderr so they never
/// land inside the prompt region on stdout.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("bookstore_core=warn"));

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}
