//! Logging configuration and initialization
//!
//! Centralized logging setup on the `tracing` ecosystem. Diagnostics go to
//! stderr so they never interleave with the report block on stdout.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: standard tracing filter (e.g. "info", "debug,logforge=trace")
//! - `LOGFORGE_LOG_LEVEL`: simple log level (error, warn, info, debug, trace)
//! - `LOGFORGE_LOG_FORMAT`: output format ("human" or "json")

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static TRACING_INITIALIZED: OnceCell<()> = OnceCell::new();

const LOG_LEVEL_ENV: &str = "LOGFORGE_LOG_LEVEL";
const LOG_FORMAT_ENV: &str = "LOGFORGE_LOG_FORMAT";

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }

    /// Convert to EnvFilter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Log format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON structured output
    Json,
}

impl LogFormat {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "human" | "pretty" | "console" => Some(LogFormat::Human),
            "json" | "structured" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

/// Initialize logging from environment variables.
///
/// Reads `RUST_LOG` first (standard tracing convention), then
/// `LOGFORGE_LOG_LEVEL`, defaulting to `warn`. Idempotent: repeated calls
/// only initialize the subscriber once.
pub fn init_logging_from_env() {
    TRACING_INITIALIZED.get_or_init(|| {
        let level = std::env::var(LOG_LEVEL_ENV)
            .ok()
            .and_then(|s| LogLevel::from_str(&s))
            .unwrap_or_default();

        let format = std::env::var(LOG_FORMAT_ENV)
            .ok()
            .and_then(|s| LogFormat::from_str(&s))
            .unwrap_or_default();

        let env_filter = match std::env::var("RUST_LOG") {
            Ok(rust_log) => {
                EnvFilter::try_new(rust_log).unwrap_or_else(|_| EnvFilter::new(level.as_filter_str()))
            }
            Err(_) => EnvFilter::new(level.as_filter_str()),
        };

        match format {
            LogFormat::Json => {
                let layer = fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(false);
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(layer)
                    .init();
            }
            LogFormat::Human => {
                let layer = fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true);
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(layer)
                    .init();
            }
        }
    });
}

/// Check if tracing has been initialized
pub fn is_initialized() -> bool {
    TRACING_INITIALIZED.get().is_some()
}
