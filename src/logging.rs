//! Tracing subscriber setup shared by both binaries

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Filter directives used when `RUST_LOG` is unset
pub fn default_directives(config: &LoggingConfig, debug: bool) -> String {
    let level = if debug { "debug" } else { config.level.as_str() };
    if level.contains('=') {
        level.to_string()
    } else {
        format!("county_atlas={level},tower_http={level}", level = level)
    }
}

/// Install the global subscriber: `RUST_LOG` wins, then the configured level
pub fn init_logging(
    config: &LoggingConfig,
    debug: bool,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(config, debug)));

    let registry = tracing_subscriber::registry().with(filter);
    if config.format.eq_ignore_ascii_case("json") {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    }
}
