//! Configuration loader with layered sources.

use crate::{AppConfig, DEFAULT_SUPER_PASSWORD};
use config::{Config, ConfigError, Environment, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use usergate_core::{UsergateError, UsergateResult};

/// Environment variable prefix, e.g. `USERGATE_DATABASE__URL`.
pub const ENV_PREFIX: &str = "USERGATE";

/// Loads [`AppConfig`] from layered sources.
///
/// Sources are applied in order, later ones overriding earlier ones:
/// 1. `{dir}/default.toml`
/// 2. `{dir}/{environment}.toml`
/// 3. `{dir}/local.toml` (not committed to version control)
/// 4. Environment variables with the `USERGATE_` prefix and `__` as the
///    nesting separator
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    environment: String,
}

impl ConfigLoader {
    /// Creates a loader reading from `config_dir`. The environment name comes
    /// from `USERGATE_ENVIRONMENT` and defaults to `development`.
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file loaded: {}", e);
        }
        let environment =
            std::env::var("USERGATE_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        Self {
            config_dir: config_dir.into(),
            environment,
        }
    }

    /// Loader for the default location (`./config`).
    #[must_use]
    pub fn from_default_location() -> Self {
        Self::new("./config")
    }

    /// Overrides the environment name.
    #[must_use]
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    /// Returns the active environment name.
    #[must_use]
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Files this loader reads, in precedence order. Missing files are skipped
    /// at load time but still listed so a watcher notices when they appear.
    #[must_use]
    pub fn source_files(&self) -> Vec<PathBuf> {
        vec![
            self.config_dir.join("default.toml"),
            self.config_dir.join(format!("{}.toml", self.environment)),
            self.config_dir.join("local.toml"),
        ]
    }

    /// Reads and validates the configuration.
    pub fn load(&self) -> UsergateResult<AppConfig> {
        info!(environment = %self.environment, "Loading configuration");

        let mut builder = Config::builder();
        for path in self.source_files() {
            if path.exists() {
                debug!("Loading config from: {}", path.display());
                builder = builder.add_source(File::from(path.as_path()).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut app_config: AppConfig = builder
            .build()
            .and_then(Config::try_deserialize::<AppConfig>)
            .map_err(config_error_to_usergate_error)?;

        app_config.app.environment.clone_from(&self.environment);
        validate_config(&app_config)?;
        Ok(app_config)
    }

    /// Directory holding the config files.
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }
}

/// Validates the loaded configuration.
fn validate_config(config: &AppConfig) -> UsergateResult<()> {
    if config.database.url.is_empty() {
        return Err(UsergateError::Configuration(
            "database.url is required".to_string(),
        ));
    }

    if config.app.super_user.is_empty() {
        return Err(UsergateError::Configuration(
            "app.super_user must not be empty".to_string(),
        ));
    }

    if config.app.environment == "production" && config.app.super_password == DEFAULT_SUPER_PASSWORD
    {
        warn!("Using the default super user password in production");
    }

    Ok(())
}

fn config_error_to_usergate_error(err: ConfigError) -> UsergateError {
    UsergateError::Configuration(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn loader_for(dir: &Path) -> ConfigLoader {
        ConfigLoader::new(dir).with_environment("test")
    }

    #[test]
    fn test_load_without_files_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = loader_for(dir.path()).load().unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.app.environment, "test");
    }

    #[test]
    fn test_environment_file_overrides_default() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "[server]\nport = 9000\n\n[observability]\nlog_level = \"info\"\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("test.toml"),
            "[observability]\nlog_level = \"debug\"\n",
        )
        .unwrap();

        let config = loader_for(dir.path()).load().unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.observability.log_level, "debug");
    }

    #[test]
    fn test_local_file_has_highest_file_precedence() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("test.toml"), "[redis]\nenabled = true\n").unwrap();
        fs::write(dir.path().join("local.toml"), "[redis]\nenabled = false\n").unwrap();

        let config = loader_for(dir.path()).load().unwrap();
        assert!(!config.redis.enabled);
    }

    #[test]
    fn test_empty_database_url_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("default.toml"), "[database]\nurl = \"\"\n").unwrap();

        let err = loader_for(dir.path()).load().unwrap_err();
        assert!(matches!(err, UsergateError::Configuration(_)));
    }

    #[test]
    fn test_malformed_file_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("default.toml"), "[server\nport = ").unwrap();

        let err = loader_for(dir.path()).load().unwrap_err();
        assert!(matches!(err, UsergateError::Configuration(_)));
    }

    #[test]
    fn test_source_files_order() {
        let loader = ConfigLoader::new("/etc/usergate").with_environment("staging");
        let files = loader.source_files();
        assert_eq!(files[0], PathBuf::from("/etc/usergate/default.toml"));
        assert_eq!(files[1], PathBuf::from("/etc/usergate/staging.toml"));
        assert_eq!(files[2], PathBuf::from("/etc/usergate/local.toml"));
    }
}
