//! Configuration for the billing gateway.
//!
//! Read once at startup. Sources, lowest to highest priority: built-in
//! defaults, an optional YAML file, then `BILLING_*` environment variables
//! (`BILLING_WEB_API_KEY`, `BILLING_LOGGING__LEVEL`, ...).

use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

use crate::platform::{BuildMode, RuntimePlatform};

/// Environment variable prefix for every billing setting.
pub const ENV_PREFIX: &str = "BILLING_";

/// Billing gateway configuration.
///
/// API keys are optional: a missing key for the active platform/build is the
/// normal "billing disabled" state, not an error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BillingConfig {
    /// Key for native debug builds (store sandbox).
    pub test_api_key: Option<SecretString>,

    /// Key for iOS release builds.
    pub apple_api_key: Option<SecretString>,

    /// Key for Android release builds.
    pub google_api_key: Option<SecretString>,

    /// Key for the web billing backend, used in any build.
    pub web_api_key: Option<SecretString>,

    /// Overrides platform detection. Mostly for tests and desktop hosts
    /// that embed a store SDK.
    pub platform: Option<RuntimePlatform>,

    /// Overrides `debug_assertions`-based build mode detection.
    pub build_mode: Option<BuildMode>,

    pub logging: LoggingConfig,
}

/// Log output settings for hosts that let the gateway install the subscriber.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

fn default_level() -> String {
    "info".to_owned()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid billing configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),
}

impl BillingConfig {
    /// Layered configuration sources.
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let figment = Figment::new();
        let figment = match path {
            Some(path) => figment.merge(Yaml::file(path)),
            None => figment,
        };
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load from environment variables only.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a variable has the wrong shape
    /// (e.g. `BILLING_PLATFORM=desktop`).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment(None))
    }

    /// Load from an optional YAML file overlaid with environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the file is malformed or contains
    /// unknown fields.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment(path))
    }

    /// Extract from an arbitrary figment (hosts that embed billing settings
    /// into a larger configuration tree can focus it first).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if extraction fails.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        figment.extract().map_err(|e| ConfigError::Invalid(Box::new(e)))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn exposed(key: Option<&SecretString>) -> Option<&str> {
        key.map(|k| k.expose_secret())
    }

    #[test]
    fn defaults_have_no_keys() {
        let cfg = BillingConfig::default();
        assert!(cfg.test_api_key.is_none());
        assert!(cfg.web_api_key.is_none());
        assert!(cfg.platform.is_none());
        assert_eq!(cfg.logging.level, "info");
        assert!(!cfg.logging.json);
    }

    #[test]
    fn env_variables_populate_keys() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("BILLING_WEB_API_KEY", "rcb_web_123");
            jail.set_env("BILLING_PLATFORM", "web");
            jail.set_env("BILLING_LOGGING__JSON", "true");

            let cfg = BillingConfig::from_env().map_err(|e| e.to_string())?;
            assert_eq!(exposed(cfg.web_api_key.as_ref()), Some("rcb_web_123"));
            assert_eq!(cfg.platform, Some(RuntimePlatform::Web));
            assert!(cfg.logging.json);
            assert!(cfg.apple_api_key.is_none());
            Ok(())
        });
    }

    #[test]
    fn env_overrides_yaml() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "billing.yaml",
                r"
                apple_api_key: appl_from_file
                test_api_key: test_from_file
                build_mode: release
                ",
            )?;
            jail.set_env("BILLING_TEST_API_KEY", "test_from_env");

            let cfg = BillingConfig::load(Some(Path::new("billing.yaml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(exposed(cfg.apple_api_key.as_ref()), Some("appl_from_file"));
            assert_eq!(exposed(cfg.test_api_key.as_ref()), Some("test_from_env"));
            assert_eq!(cfg.build_mode, Some(BuildMode::Release));
            Ok(())
        });
    }

    #[test]
    fn unknown_fields_are_rejected() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("billing.yaml", "stripe_key: sk_live_oops\n")?;

            let result = BillingConfig::load(Some(Path::new("billing.yaml")));
            assert!(matches!(result, Err(ConfigError::Invalid(_))));
            Ok(())
        });
    }

    #[test]
    fn invalid_platform_is_rejected() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("BILLING_PLATFORM", "desktop");

            assert!(BillingConfig::from_env().is_err());
            Ok(())
        });
    }
}
