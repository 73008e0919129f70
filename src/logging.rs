use std::sync::OnceLock;

use tracing_log::LogTracer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INSTALL_GUARD: OnceLock<()> = OnceLock::new();

/// Install a global tracing subscriber filtered by `RUST_LOG`, bridging
/// `log` records. Safe to call more than once; later calls are no-ops, as
/// is this one when an embedding application already installed its own
/// subscriber.
pub fn init_tracing() {
    INSTALL_GUARD.get_or_init(|| {
        let _ = LogTracer::init();

        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false).compact();

        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init();
    });
}
