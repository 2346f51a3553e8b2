use crate::config::TelemetryConfig;
use std::env;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the configured log level.
const FILTER_OVERRIDE_VAR: &str = "RUST_LOG";
const LOG_LEVEL_VAR: &str = "APP_LOG_LEVEL";

#[derive(Debug)]
pub enum TelemetryError {
    /// The filter directive read from `variable` does not parse.
    InvalidFilter {
        variable: &'static str,
        filter: String,
        source: ParseError,
    },
    AlreadyInitialized(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::InvalidFilter {
                variable, filter, ..
            } => write!(f, "{variable} holds an unusable log filter '{filter}'"),
            TelemetryError::AlreadyInitialized(err) => {
                write!(f, "logging was already initialized: {err}")
            }
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::InvalidFilter { source, .. } => Some(source),
            TelemetryError::AlreadyInitialized(err) => Some(&**err),
        }
    }
}

/// Installs the global subscriber. Logs go to stderr so audit listings on
/// stdout stay clean.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let override_filter = env::var(FILTER_OVERRIDE_VAR).ok();
    let env_filter = build_filter(config, override_filter.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::AlreadyInitialized)
}

/// A non-empty `RUST_LOG` wins over the configured level; either one must
/// parse.
fn build_filter(
    config: &TelemetryConfig,
    override_filter: Option<&str>,
) -> Result<EnvFilter, TelemetryError> {
    let (variable, filter) = match override_filter.map(str::trim) {
        Some(filter) if !filter.is_empty() => (FILTER_OVERRIDE_VAR, filter),
        _ => (LOG_LEVEL_VAR, config.log_level.as_str()),
    };

    EnvFilter::try_new(filter).map_err(|source| TelemetryError::InvalidFilter {
        variable,
        filter: filter.to_string(),
        source,
    })
}
