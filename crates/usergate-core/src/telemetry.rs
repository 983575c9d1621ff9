//! Logging bootstrap.
//!
//! Installs a `tracing` subscriber whose filter sits behind a reload layer,
//! so the level can be changed at runtime when configuration is reloaded.

use crate::{UsergateError, UsergateResult};
use serde::{Deserialize, Serialize};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter, Registry,
};

/// Output format of log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Handle for changing the active log filter after startup.
#[derive(Clone)]
pub struct LoggingHandle {
    inner: reload::Handle<EnvFilter, Registry>,
}

impl LoggingHandle {
    /// Replaces the active filter with `directives` (e.g. `"debug"` or
    /// `"info,usergate=debug"`).
    pub fn set_level(&self, directives: &str) -> UsergateResult<()> {
        let filter = parse_filter(directives)?;
        self.inner
            .reload(filter)
            .map_err(|e| UsergateError::Configuration(format!("failed to reload log filter: {e}")))
    }
}

impl std::fmt::Debug for LoggingHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggingHandle").finish_non_exhaustive()
    }
}

/// Installs the global subscriber.
///
/// `RUST_LOG` takes precedence over `level` at startup.
pub fn init_logging(level: &str, format: LogFormat) -> UsergateResult<LoggingHandle> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => parse_filter(level)?,
    };
    let (filter_layer, handle) = reload::Layer::new(filter);

    let json = format == LogFormat::Json;
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(json.then(|| fmt::layer().json().with_target(true)))
        .with((!json).then(|| fmt::layer().with_target(true)))
        .try_init()
        .map_err(|e| UsergateError::Configuration(format!("failed to install logger: {e}")))?;

    Ok(LoggingHandle { inner: handle })
}

fn parse_filter(directives: &str) -> UsergateResult<EnvFilter> {
    EnvFilter::try_new(directives)
        .map_err(|e| UsergateError::Configuration(format!("invalid log level '{directives}': {e}")))
}
