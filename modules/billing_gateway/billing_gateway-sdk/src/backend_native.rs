//! Contract for the native in-app-purchase SDK.
//!
//! The native store SDK is owned by the platform (App Store / Play Store
//! bindings). Implementations wrap that SDK; the gateway configures it once
//! at construction and never replaces it.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::BillingSdkError;
use crate::models::{CustomerInfo, LogInResult, Offerings, Package, PurchaseResult};

/// Severity reported by the native SDK's log hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeLogLevel {
    Verbose,
    Debug,
    Info,
    Warn,
    Error,
}

/// Callback receiving the native SDK's own log lines.
pub type NativeLogHandler = Arc<dyn Fn(NativeLogLevel, &str) + Send + Sync>;

/// Native in-app-purchase SDK.
///
/// `configure` is synchronous and called at most once per process by the
/// gateway. Every other call may suspend on a native-bridge round-trip.
#[async_trait]
pub trait NativeStoreClient: Send + Sync {
    /// Configure the SDK with the platform API key.
    ///
    /// # Errors
    ///
    /// Returns error if the SDK rejects the key or cannot start.
    fn configure(&self, api_key: &str) -> Result<(), BillingSdkError>;

    /// Install a handler for the SDK's internal log output.
    ///
    /// SDKs without a log hook can keep the default no-op.
    fn set_log_handler(&self, handler: NativeLogHandler) {
        let _ = handler;
    }

    /// Fetch the offerings catalog.
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be reached or answers garbage.
    async fn get_offerings(&self) -> Result<Offerings, BillingSdkError>;

    /// Run the store purchase flow for a package.
    ///
    /// # Errors
    ///
    /// Returns error if the purchase is declined, cancelled, or fails.
    async fn purchase_package(&self, package: &Package) -> Result<PurchaseResult, BillingSdkError>;

    /// Fetch the current customer snapshot.
    ///
    /// # Errors
    ///
    /// Returns error if the backend cannot be reached.
    async fn get_customer_info(&self) -> Result<CustomerInfo, BillingSdkError>;

    /// Re-sync purchases made with the current store account.
    ///
    /// # Errors
    ///
    /// Returns error if the store refuses the restore.
    async fn restore_purchases(&self) -> Result<CustomerInfo, BillingSdkError>;

    /// Associate the SDK with an app user ID.
    ///
    /// # Errors
    ///
    /// Returns error if the backend rejects the identity change.
    async fn log_in(&self, app_user_id: &str) -> Result<LogInResult, BillingSdkError>;

    /// Switch the SDK back to an anonymous user.
    ///
    /// # Errors
    ///
    /// Returns error if the backend rejects the identity change.
    async fn log_out(&self) -> Result<CustomerInfo, BillingSdkError>;
}
