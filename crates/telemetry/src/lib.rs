//! Tracing subscriber bootstrap shared by the server and the CLI.
//!
//! Logs always go to stderr so stdout stays free for command output such as
//! the seeder's status line.

use posters_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber. Calling it twice is a no-op.
pub fn init(settings: &TelemetrySettings) {
    let filter = env_filter(settings.log_filter.as_deref());

    let installed = match settings.log_format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
    };

    if installed.is_ok() {
        tracing::debug!(
            target: "posters-telemetry",
            format = ?settings.log_format,
            "telemetry initialized"
        );
    }
}

/// `RUST_LOG` wins; otherwise the configured directive, then `info`.
fn env_filter(configured: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured.unwrap_or(DEFAULT_FILTER)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
