//! Logging initialization.
//!
//! The configured level applies to every target except sqlx, which reports
//! each statement at info and is held at `warn`. `RUST_LOG` replaces the
//! whole filter when set.

use std::str::FromStr;

use thiserror::Error;
use tracing_subscriber::{
    filter::LevelFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
    EnvFilter,
};

use crate::config::LoggingConfig;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log level: {0}")]
    InvalidLevel(String),

    #[error("Invalid log format: {0} (expected json or pretty)")]
    InvalidFormat(String),

    #[error("Failed to install the global subscriber: {0}")]
    Init(#[from] TryInitError),
}

/// Output format of the fmt layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            _ => Err(LoggingError::InvalidFormat(s.to_string())),
        }
    }
}

/// Filter directives used when `RUST_LOG` is not set.
pub fn default_directives(level: &str) -> Result<String, LoggingError> {
    let level = level.trim().to_ascii_lowercase();
    level
        .parse::<LevelFilter>()
        .map_err(|_| LoggingError::InvalidLevel(level.clone()))?;
    Ok(format!("{},sqlx=warn", level))
}

/// Installs the global subscriber. Fails on an unknown level or format, or
/// when a subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    let format: LogFormat = config.format.parse()?;
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(default_directives(&config.level)?),
    };

    let subscriber = tracing_subscriber::registry().with(env_filter);

    match format {
        LogFormat::Json => {
            let json_layer = fmt::layer()
                .json()
                .with_span_events(FmtSpan::CLOSE)
                .with_current_span(true)
                .with_target(true);
            subscriber.with(json_layer).try_init()?;
        }
        LogFormat::Pretty => {
            let pretty_layer = fmt::layer()
                .pretty()
                .with_span_events(FmtSpan::CLOSE)
                .with_target(true);
            subscriber.with(pretty_layer).try_init()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!(" Pretty ".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!(matches!(
            "yaml".parse::<LogFormat>(),
            Err(LoggingError::InvalidFormat(f)) if f == "yaml"
        ));
    }

    #[test]
    fn test_default_directives_hold_sqlx_at_warn() {
        assert_eq!(default_directives("info").unwrap(), "info,sqlx=warn");
        assert_eq!(default_directives("DEBUG").unwrap(), "debug,sqlx=warn");
    }

    #[test]
    fn test_default_directives_reject_unknown_level() {
        assert!(matches!(
            default_directives("loud"),
            Err(LoggingError::InvalidLevel(l)) if l == "loud"
        ));
    }

    #[test]
    fn test_init_logging_rejects_bad_format_before_installing() {
        let config = LoggingConfig {
            level: "info".to_string(),
            format: "xml".to_string(),
        };
        assert!(matches!(
            init_logging(&config),
            Err(LoggingError::InvalidFormat(_))
        ));
    }
}
