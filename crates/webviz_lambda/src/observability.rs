//! Structured JSON logging for the Lambda binaries.
//!
//! Events are emitted with a `component` field (`cors_sync`, `scene_url`)
//! and an `event` name so CloudWatch Logs Insights can filter on either.

use std::sync::Once;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Installs the JSON subscriber. `RUST_LOG` overrides the default `info`
/// filter. Repeated calls are no-ops.
pub fn init_logging() {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(false)
                    .with_target(false),
            )
            .try_init();
    });
}
