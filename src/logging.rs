//! # Structured Logging Module
//!
//! Environment-aware structured logging for hosts that do not install their
//! own `tracing` subscriber. Libraries embedding the probe usually already
//! have one; initialization then becomes a no-op.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with environment-specific configuration
///
/// `RUST_LOG` wins over the environment default when set.
/// `DB_LOAD_HEALTH_LOG_FORMAT=json` switches to JSON lines.
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(get_log_level(&environment)));
        let json = wants_json(std::env::var("DB_LOAD_HEALTH_LOG_FORMAT").ok().as_deref());

        let registry = tracing_subscriber::registry().with(filter);
        let result = if json {
            registry
                .with(fmt::layer().json().with_target(true).with_thread_ids(true))
                .try_init()
        } else {
            registry
                .with(fmt::layer().with_target(true).with_thread_ids(true))
                .try_init()
        };

        // A global subscriber is already set by the host; keep using it
        if result.is_err() {
            tracing::debug!("Global tracing subscriber already initialized - continuing with existing subscriber");
        }

        tracing::info!(
            environment = %environment,
            json = json,
            "Structured logging initialized"
        );
    });
}

/// Get current environment from environment variables
fn get_environment() -> String {
    std::env::var("DB_LOAD_HEALTH_ENV")
        .or_else(|_| std::env::var("RAILS_ENV"))
        .or_else(|_| std::env::var("RACK_ENV"))
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        _ => "debug",
    }
}

fn wants_json(format: Option<&str>) -> bool {
    format.is_some_and(|f| f.eq_ignore_ascii_case("json"))
}
