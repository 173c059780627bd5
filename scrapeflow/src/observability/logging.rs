//! Subscriber installation for binaries and tests.

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Default filter directive when `RUST_LOG` is unset.
const DEFAULT_DIRECTIVE: &str = "info";

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Installs the global `tracing` subscriber.
///
/// Returns false when a subscriber was already installed; the existing one
/// is kept.
pub fn init_logging(format: LogFormat) -> bool {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false);

    let installed = match format {
        LogFormat::Pretty => builder.try_init().is_ok(),
        LogFormat::Json => builder.json().try_init().is_ok(),
    };
    if installed {
        tracing::debug!(?format, "Logging initialized");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_twice_is_harmless() {
        let _ = init_logging(LogFormat::Json);
        assert!(!init_logging(LogFormat::Pretty));
    }

    #[test]
    fn test_log_format_from_config() {
        let format: LogFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(format, LogFormat::Json);
        assert_eq!(LogFormat::default(), LogFormat::Pretty);
    }
}
