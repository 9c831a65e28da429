//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! optional TOML files and `LEDGERDESK__` environment variables. Each
//! sub-module represents a logical configuration section, and every section
//! has defaults so the application starts without any file present.

pub mod app;
pub mod logging;
pub mod modules;
pub mod store;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::logging::LoggingConfig;
pub use self::modules::ModuleConfig;
pub use self::store::StoreConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Flat-file data store settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Module catalog offered to the permission engine.
    #[serde(default = "modules::default_modules")]
    pub modules: Vec<ModuleConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            store: StoreConfig::default(),
            logging: LoggingConfig::default(),
            modules: modules::default_modules(),
        }
    }
}

impl AppConfig {
    /// Load configuration for the given environment name.
    ///
    /// Merges `config/default`, the environment overlay `config/{env}` and
    /// environment variables prefixed with `LEDGERDESK__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("LEDGERDESK")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Load configuration from a single explicit file.
    pub fn load_file(path: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("LEDGERDESK")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let loaded: Self = config.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Check cross-field constraints that serde defaults cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        let mut seen = std::collections::HashSet::new();
        for module in &self.modules {
            if module.key.trim().is_empty() {
                return Err(AppError::configuration("Module keys must not be empty"));
            }
            if !seen.insert(module.key.as_str()) {
                return Err(AppError::configuration(format!(
                    "Duplicate module key '{}'",
                    module.key
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.modules.len(), 10);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.store.permissions_file, "permissions.json");
    }

    #[test]
    fn test_duplicate_module_rejected() {
        let mut config = AppConfig::default();
        config.modules.push(ModuleConfig {
            key: "kosten".to_string(),
            label: "Kosten".to_string(),
            sensitive: false,
        });
        let err = config.validate().unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Configuration);
    }
}
