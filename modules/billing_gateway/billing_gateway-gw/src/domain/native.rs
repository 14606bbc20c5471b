//! Native store backend.
//!
//! The store SDK is configured once, synchronously, when the backend is
//! built. A configuration failure is kept as [`NativeState::ConfigFailed`]
//! and every later call reports `not_configured`; there is no retry.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use billing_gateway_sdk::{CustomerInfo, NativeStoreClient, Offerings, Package};
use secrecy::{ExposeSecret, SecretString};
use tracing::{error, info};

use super::backend::{BackendError, BackendStatus, BillingBackend};
use crate::platform::BillingTarget;
use crate::telemetry::{LOG_TARGET, native_log_handler};

/// Configuration state of the native SDK.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeState {
    /// No key for this platform/build.
    NotConfigured,
    /// A key was present but configuration failed.
    ConfigFailed { reason: String },
    Configured,
}

impl fmt::Display for NativeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConfigured => f.write_str("not_configured"),
            Self::ConfigFailed { reason } => write!(f, "config_failed: {reason}"),
            Self::Configured => f.write_str("configured"),
        }
    }
}

pub struct NativeBackend {
    client: Option<Arc<dyn NativeStoreClient>>,
    state: NativeState,
}

impl NativeBackend {
    /// Configure the store SDK with `api_key`.
    ///
    /// Never fails: the outcome is recorded in [`NativeBackend::state`].
    #[must_use]
    pub fn configure(
        client: Option<Arc<dyn NativeStoreClient>>,
        api_key: Option<&SecretString>,
    ) -> Self {
        let Some(api_key) = api_key else {
            return Self {
                client: None,
                state: NativeState::NotConfigured,
            };
        };

        let Some(client) = client else {
            error!(target: LOG_TARGET, "native billing key present but no store SDK was provided");
            return Self {
                client: None,
                state: NativeState::ConfigFailed {
                    reason: "native store SDK not provided".to_owned(),
                },
            };
        };

        client.set_log_handler(native_log_handler());

        match client.configure(api_key.expose_secret()) {
            Ok(()) => {
                info!(target: LOG_TARGET, "native store SDK configured");
                Self {
                    client: Some(client),
                    state: NativeState::Configured,
                }
            }
            Err(e) => {
                error!(target: LOG_TARGET, error = %e, "native store SDK configuration failed");
                Self {
                    client: None,
                    state: NativeState::ConfigFailed {
                        reason: e.to_string(),
                    },
                }
            }
        }
    }

    #[must_use]
    pub fn state(&self) -> &NativeState {
        &self.state
    }

    fn client(&self) -> Result<&Arc<dyn NativeStoreClient>, BackendError> {
        self.client.as_ref().ok_or(BackendError::NotConfigured)
    }
}

#[async_trait]
impl BillingBackend for NativeBackend {
    fn target(&self) -> BillingTarget {
        BillingTarget::Native
    }

    fn is_configured(&self) -> bool {
        self.state == NativeState::Configured
    }

    fn status(&self) -> BackendStatus {
        BackendStatus::Native(self.state.clone())
    }

    async fn get_offerings(&self) -> Result<Offerings, BackendError> {
        Ok(self.client()?.get_offerings().await?)
    }

    async fn purchase_package(&self, package: &Package) -> Result<CustomerInfo, BackendError> {
        let result = self.client()?.purchase_package(package).await?;
        Ok(result.customer_info)
    }

    async fn get_customer_info(&self) -> Result<CustomerInfo, BackendError> {
        Ok(self.client()?.get_customer_info().await?)
    }

    async fn restore_purchases(&self) -> Result<CustomerInfo, BackendError> {
        Ok(self.client()?.restore_purchases().await?)
    }

    async fn log_in(&self, app_user_id: &str) -> Result<CustomerInfo, BackendError> {
        let result = self.client()?.log_in(app_user_id).await?;
        Ok(result.customer_info)
    }

    async fn log_out(&self) -> Result<(), BackendError> {
        self.client()?.log_out().await?;
        Ok(())
    }
}
