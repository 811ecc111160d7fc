use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub mod settings;
pub mod validation;

pub use settings::{
    AuthSettings, ConfigSource, ResolvedSettings, ServerSection, ServerSettings, StoreSettings,
    DEFAULT_SOCKET_PATH, MAX_SESSION_TTL_MINUTES,
};
pub use validation::{validate_configuration, ConfigurationValidator};

const DEFAULT_DIRECTIVES: &str = "civicalert=info,tokio=warn";

/// Initialize logging with structured output and environment-based level filtering.
///
/// `RUST_LOG` wins over `level`; `level` wins over the built-in default.
/// Output goes to stderr because stdout carries the stdio transport.
pub fn init_logging(level: Option<&str>) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match level {
        Some(level) => EnvFilter::new(format!("civicalert={},tokio=warn", level)),
        None => EnvFilter::new(DEFAULT_DIRECTIVES),
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_names(false)
                .with_file(true)
                .with_line_number(true)
                .with_level(true)
                .compact(),
        )
        .try_init()?;

    tracing::info!("Structured logging initialized");
    Ok(())
}

/// Initialize logging for testing with reduced verbosity
pub fn init_test_logging() -> anyhow::Result<()> {
    let env_filter = EnvFilter::new("civicalert=debug");

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_test_writer().compact())
        .try_init()
        .or_else(|_| Ok(())) // Ignore if already initialized
}

/// Log structured events keyed by incident id or RPC method
#[macro_export]
macro_rules! log_event {
    (incident = $incident_id:expr, $level:ident, $($field:tt)*) => {
        tracing::$level!(
            incident_id = $incident_id,
            $($field)*
        );
    };
    (method = $method:expr, $level:ident, $($field:tt)*) => {
        tracing::$level!(
            method = $method,
            $($field)*
        );
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_test_logging_is_reentrant() {
        assert!(init_test_logging().is_ok());
        assert!(init_test_logging().is_ok());
    }
}
