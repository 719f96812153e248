use models::{LogFormat, LoggingSettings};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured filter. Calling this twice
/// is harmless: the second call leaves the first subscriber in place.
pub fn init(settings: &LoggingSettings) {
    let filter = build_filter(&settings.filter);
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match settings.format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    if installed.is_ok() {
        tracing::debug!(filter = %settings.filter, format = ?settings.format, "Logger initialised");
    }
}

fn build_filter(configured: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(configured))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_does_not_panic() {
        let settings = LoggingSettings {
            filter: "info".to_string(),
            format: LogFormat::Compact,
        };
        init(&settings);
        init(&settings);
    }
}
