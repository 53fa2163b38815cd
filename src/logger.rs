//! `tracing` subscriber set up from [`crate::config::Logger`].

use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use crate::config::{LogFormat, Logger};

/// Builds the filter directive: the override filter wins, then `RUST_LOG`,
/// then the configured level.
fn env_filter(config: &Logger) -> EnvFilter {
    if let Some(directive) = &config.override_filter {
        return EnvFilter::new(directive);
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.level.as_str()))
}

/// Installs the global subscriber.
///
/// Nothing happens when logging is disabled or a global subscriber is
/// already installed, so calling this more than once is harmless.
pub fn init(config: &Logger) {
    if !config.enable {
        return;
    }

    let layer: Box<dyn Layer<Registry> + Send + Sync> = match config.format {
        LogFormat::Compact => fmt::layer().compact().boxed(),
        LogFormat::Pretty => fmt::layer().pretty().boxed(),
        LogFormat::Json => fmt::layer().json().boxed(),
    };

    let installed = tracing_subscriber::registry()
        .with(layer.with_filter(env_filter(config)))
        .try_init();
    if installed.is_err() {
        tracing::debug!("logger_already_initialized");
    }
}
