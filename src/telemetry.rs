//! Tracing subscriber initialisation.

use crate::config::{LoggingLevel, TelemetryConfig};
use tracing::metadata::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Registry};

impl From<LoggingLevel> for LevelFilter {
    fn from(level: LoggingLevel) -> Self {
        match level {
            LoggingLevel::Error => Self::ERROR,
            LoggingLevel::Warn => Self::WARN,
            LoggingLevel::Info => Self::INFO,
            LoggingLevel::Debug => Self::DEBUG,
            LoggingLevel::Trace => Self::TRACE,
            LoggingLevel::Off => Self::OFF,
        }
    }
}

/// Builds the filter from the configured level, directives, and override
/// variable.
#[must_use]
pub fn build_filter(config: &TelemetryConfig) -> EnvFilter {
    let builder =
        EnvFilter::builder().with_default_directive(LevelFilter::from(config.level).into());
    let overridden = if config.filter_env.is_empty() {
        None
    } else {
        std::env::var(config.filter_env.as_str())
            .ok()
            .filter(|directives| !directives.is_empty())
    };
    builder.parse_lossy(overridden.as_deref().unwrap_or(config.filter.as_str()))
}

/// Installs the global subscriber.
///
/// Does nothing when telemetry is disabled.
///
/// # Errors
///
/// Returns [`TryInitError`] if a global subscriber is already installed.
pub fn init(config: &TelemetryConfig) -> Result<(), TryInitError> {
    if !config.enable {
        return Ok(());
    }
    let debug = config.debug_logging;
    let console = tracing_subscriber::fmt::layer()
        .with_file(debug)
        .with_line_number(debug)
        .with_thread_ids(debug)
        .with_target(debug);

    Registry::default()
        .with(build_filter(config))
        .with(console)
        .try_init()
}
