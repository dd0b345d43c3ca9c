//! Tracing Initialization
//!
//! Configures the global tracing subscriber: `RUST_LOG`-driven env
//! filter with a sensible default directive, plus a fmt layer with
//! targets.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Default filter directive when `RUST_LOG` is unset.
const DEFAULT_DIRECTIVE: &str = "finnhub_news_alerter=info";

/// Initialize the global tracing subscriber.
///
/// Safe to call once at startup; later calls are ignored so tests can
/// initialize freely.
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}
