//! Tracing setup for the cielo tools.
//!
//! ```ignore
//! use cielo_common::telemetry::{self, TelemetryConfig};
//!
//! telemetry::init(TelemetryConfig::from_env("cielo"));
//! tracing::info!("ready");
//! ```

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Name logged once tracing is up (e.g. "cielo").
    pub service_name: String,
    /// Console level when `RUST_LOG` is unset (DEBUG in debug builds, else INFO).
    pub console_level: Level,
    /// Write to stderr so command output on stdout stays clean.
    pub stderr: bool,
}

impl TelemetryConfig {
    pub fn from_env(service_name: impl Into<String>) -> Self {
        let console_level = if cfg!(debug_assertions) {
            Level::DEBUG
        } else {
            Level::INFO
        };

        Self {
            service_name: service_name.into(),
            console_level,
            stderr: true,
        }
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.console_level = level;
        self
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.console_level.as_str().to_lowercase()))
    }
}

/// Install the global subscriber. Returns false if one was already set.
pub fn init(config: TelemetryConfig) -> bool {
    let env_filter = config.filter();

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact();

    let result = if config.stderr {
        tracing_subscriber::registry()
            .with(console_layer.with_writer(std::io::stderr).with_filter(env_filter))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(console_layer.with_filter(env_filter))
            .try_init()
    };

    match result {
        Ok(()) => {
            tracing::debug!(service = %config.service_name, "tracing initialized");
            true
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_refused() {
        let config = TelemetryConfig::from_env("cielo-test").with_level(Level::WARN);
        init(config.clone());
        assert!(!init(config));
    }
}
