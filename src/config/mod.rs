//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `SURVEY_FLOW` prefix and
//! nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use survey_flow::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Surveys served from {}", config.client.base_url);
//! ```

mod client;
mod error;
mod logging;
mod navigation;
mod storage;

pub use client::ClientConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use navigation::NavigationConfig;
pub use storage::StorageConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment loads successfully.
#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Hosted survey API
    #[serde(default)]
    pub client: ClientConfig,

    /// Navigation limits
    #[serde(default)]
    pub navigation: NavigationConfig,

    /// Tracing output
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Local survey files
    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `SURVEY_FLOW` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `SURVEY_FLOW__CLIENT__BASE_URL=...` -> `client.base_url = ...`
    /// - `SURVEY_FLOW__NAVIGATION__MAX_PATH_LENGTH=64` -> `navigation.max_path_length = 64`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SURVEY_FLOW")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for a non-http base URL, a timeout outside
    /// 1..=300 seconds, a zero path cap or an unparsable log filter.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.client.validate()?;
        self.navigation.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        env::remove_var("SURVEY_FLOW__CLIENT__BASE_URL");
        env::remove_var("SURVEY_FLOW__CLIENT__API_KEY");
        env::remove_var("SURVEY_FLOW__CLIENT__TIMEOUT_SECS");
        env::remove_var("SURVEY_FLOW__NAVIGATION__MAX_PATH_LENGTH");
        env::remove_var("SURVEY_FLOW__LOGGING__JSON");
        env::remove_var("SURVEY_FLOW__STORAGE__SURVEY_DIR");
    }

    #[test]
    fn test_load_with_empty_environment_uses_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.navigation.max_path_length, 256);
        assert!(!config.storage.is_local());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("SURVEY_FLOW__CLIENT__BASE_URL", "https://feedback.example.com/api");
        env::set_var("SURVEY_FLOW__CLIENT__API_KEY", "sk_test_xxx");
        env::set_var("SURVEY_FLOW__CLIENT__TIMEOUT_SECS", "5");
        env::set_var("SURVEY_FLOW__NAVIGATION__MAX_PATH_LENGTH", "32");
        env::set_var("SURVEY_FLOW__LOGGING__JSON", "true");
        env::set_var("SURVEY_FLOW__STORAGE__SURVEY_DIR", "/srv/surveys");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.client.base_url, "https://feedback.example.com/api");
        assert!(config.client.has_api_key());
        assert_eq!(config.client.timeout_secs, 5);
        assert_eq!(config.navigation.max_path_length, 32);
        assert!(config.logging.json);
        assert!(config.storage.is_local());
    }

    #[test]
    fn test_validate_rejects_bad_section() {
        let config = AppConfig {
            navigation: NavigationConfig { max_path_length: 0 },
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidPathLength));
    }

    #[test]
    fn test_api_key_not_leaked_in_debug() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("SURVEY_FLOW__CLIENT__API_KEY", "sk_live_hidden");
        let result = AppConfig::load();
        clear_env();

        let debug = format!("{:?}", result.unwrap());
        assert!(!debug.contains("sk_live_hidden"));
    }
}
