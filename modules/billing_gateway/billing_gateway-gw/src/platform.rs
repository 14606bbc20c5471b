//! Platform resolution.
//!
//! Maps the runtime platform, the build mode and the configured keys onto
//! the backend to use and the API key to hand it. Pure: no I/O, no errors.
//! A missing key is reported as `None`, which the gateway treats as
//! "not configured".

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::config::BillingConfig;

/// Platform the process runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuntimePlatform {
    Ios,
    Android,
    Web,
}

impl RuntimePlatform {
    /// Platform of the compile target. Hosts without a store SDK
    /// (desktop, server, `wasm32`) use web billing.
    #[must_use]
    pub const fn detect() -> Self {
        if cfg!(target_os = "ios") {
            Self::Ios
        } else if cfg!(target_os = "android") {
            Self::Android
        } else {
            Self::Web
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ios => "ios",
            Self::Android => "android",
            Self::Web => "web",
        }
    }
}

impl fmt::Display for RuntimePlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildMode {
    Debug,
    Release,
}

impl BuildMode {
    #[must_use]
    pub const fn detect() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Release => "release",
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which backend family serves this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingTarget {
    Native,
    Web,
}

impl BillingTarget {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Web => "web",
        }
    }
}

impl fmt::Display for BillingTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of [`resolve`].
#[derive(Debug, Clone)]
pub struct Resolution {
    pub platform: RuntimePlatform,
    pub build_mode: BuildMode,
    pub target: BillingTarget,
    api_key: Option<SecretString>,
}

impl Resolution {
    /// Key selected for the target, if any.
    #[must_use]
    pub fn api_key(&self) -> Option<&SecretString> {
        self.api_key.as_ref()
    }

    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Select the backend and key.
///
/// Precedence: web platform → web key; native debug build → test key;
/// native release build → the iOS or Android production key.
#[must_use]
pub fn resolve(platform: RuntimePlatform, build_mode: BuildMode, config: &BillingConfig) -> Resolution {
    let (target, key) = match (platform, build_mode) {
        (RuntimePlatform::Web, _) => (BillingTarget::Web, config.web_api_key.as_ref()),
        (_, BuildMode::Debug) => (BillingTarget::Native, config.test_api_key.as_ref()),
        (RuntimePlatform::Ios, BuildMode::Release) => {
            (BillingTarget::Native, config.apple_api_key.as_ref())
        }
        (RuntimePlatform::Android, BuildMode::Release) => {
            (BillingTarget::Native, config.google_api_key.as_ref())
        }
    };

    Resolution {
        platform,
        build_mode,
        target,
        api_key: key.filter(|k| !k.expose_secret().trim().is_empty()).cloned(),
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn all_keys() -> BillingConfig {
        BillingConfig {
            test_api_key: Some("test_key".into()),
            apple_api_key: Some("appl_key".into()),
            google_api_key: Some("goog_key".into()),
            web_api_key: Some("rcb_key".into()),
            ..BillingConfig::default()
        }
    }

    fn key_of(resolution: &Resolution) -> Option<&str> {
        resolution.api_key().map(|k| k.expose_secret())
    }

    #[test]
    fn web_uses_web_key_in_any_build() {
        let cfg = all_keys();
        for mode in [BuildMode::Debug, BuildMode::Release] {
            let r = resolve(RuntimePlatform::Web, mode, &cfg);
            assert_eq!(r.target, BillingTarget::Web);
            assert_eq!(key_of(&r), Some("rcb_key"));
        }
    }

    #[test]
    fn native_debug_uses_test_key_on_both_platforms() {
        let cfg = all_keys();
        for platform in [RuntimePlatform::Ios, RuntimePlatform::Android] {
            let r = resolve(platform, BuildMode::Debug, &cfg);
            assert_eq!(r.target, BillingTarget::Native);
            assert_eq!(key_of(&r), Some("test_key"));
        }
    }

    #[test]
    fn native_release_uses_platform_key() {
        let cfg = all_keys();
        let ios = resolve(RuntimePlatform::Ios, BuildMode::Release, &cfg);
        let android = resolve(RuntimePlatform::Android, BuildMode::Release, &cfg);
        assert_eq!(key_of(&ios), Some("appl_key"));
        assert_eq!(key_of(&android), Some("goog_key"));
    }

    #[test]
    fn other_platform_keys_never_leak_in() {
        let cfg = BillingConfig {
            web_api_key: Some("rcb_key".into()),
            apple_api_key: Some("appl_key".into()),
            ..BillingConfig::default()
        };
        assert!(!resolve(RuntimePlatform::Ios, BuildMode::Debug, &cfg).has_api_key());
        assert!(!resolve(RuntimePlatform::Android, BuildMode::Release, &cfg).has_api_key());

        let cfg = BillingConfig {
            test_api_key: Some("test_key".into()),
            ..BillingConfig::default()
        };
        assert!(!resolve(RuntimePlatform::Web, BuildMode::Debug, &cfg).has_api_key());
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let cfg = BillingConfig {
            web_api_key: Some("   ".into()),
            ..BillingConfig::default()
        };
        assert!(!resolve(RuntimePlatform::Web, BuildMode::Release, &cfg).has_api_key());
    }

    #[test]
    #[allow(clippy::use_debug)]
    fn debug_output_redacts_key() {
        let r = resolve(RuntimePlatform::Web, BuildMode::Release, &all_keys());
        let rendered = format!("{r:?}");
        assert!(!rendered.contains("rcb_key"));
    }
}
