//! Backend seam between the gateway service and a concrete billing SDK.

use async_trait::async_trait;
use billing_gateway_sdk::{BillingSdkError, CustomerInfo, Offerings, Package};
use thiserror::Error;

use super::native::NativeState;
use super::session::WebSessionState;
use crate::platform::BillingTarget;

/// Failure of a backend call before it is mapped to a guard reason.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("action not supported by this backend")]
    Unsupported,

    #[error("backend not configured")]
    NotConfigured,

    #[error(transparent)]
    Sdk(#[from] BillingSdkError),
}

/// Observable state of the selected backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendStatus {
    Native(NativeState),
    Web(WebSessionState),
}

/// One billing backend family.
///
/// Actions a backend has no equivalent for keep the default body and report
/// [`BackendError::Unsupported`] without touching the SDK.
#[async_trait]
pub trait BillingBackend: Send + Sync {
    fn target(&self) -> BillingTarget;

    /// `true` once the backend can serve calls (or, for web, lazily will).
    fn is_configured(&self) -> bool;

    fn status(&self) -> BackendStatus;

    /// # Errors
    ///
    /// Returns [`BackendError`] on any backend failure; the same holds for
    /// every action below.
    async fn get_offerings(&self) -> Result<Offerings, BackendError> {
        Err(BackendError::Unsupported)
    }

    async fn purchase_package(&self, package: &Package) -> Result<CustomerInfo, BackendError> {
        let _ = package;
        Err(BackendError::Unsupported)
    }

    async fn get_customer_info(&self) -> Result<CustomerInfo, BackendError> {
        Err(BackendError::Unsupported)
    }

    async fn restore_purchases(&self) -> Result<CustomerInfo, BackendError> {
        Err(BackendError::Unsupported)
    }

    async fn log_in(&self, app_user_id: &str) -> Result<CustomerInfo, BackendError> {
        let _ = app_user_id;
        Err(BackendError::Unsupported)
    }

    async fn log_out(&self) -> Result<(), BackendError> {
        Err(BackendError::Unsupported)
    }
}
