//! Public gateway API trait for billing.
//!
//! This trait is what application code depends on. The gateway
//! implementation routes every call to the one backend selected for the
//! process (native store or web billing).

use async_trait::async_trait;

use crate::models::{CustomerInfo, Offerings, Package};
use crate::result::OperationResult;

/// Public API trait for the billing gateway.
///
/// No method panics or leaks backend errors: every outcome is an
/// [`OperationResult`]. Derived queries (`has_entitlement`,
/// `has_active_subscription`, `get_package`) forward the failure of the
/// primitive they are built on unchanged.
///
/// # Example
///
/// ```
/// # use billing_gateway_sdk::{BillingGatewayClient, GuardReason};
/// # async fn example(billing: &dyn BillingGatewayClient) {
/// match billing.has_entitlement("premium").await {
///     Ok(true) => { /* unlock */ }
///     Ok(false) => { /* show paywall */ }
///     Err(e) if e.reason() == GuardReason::NotConfigured => { /* billing off in this build */ }
///     Err(_) => { /* retry later */ }
/// }
/// # }
/// ```
#[async_trait]
pub trait BillingGatewayClient: Send + Sync {
    /// `true` when the native store backend is selected and configured.
    fn is_billing_enabled(&self) -> bool;

    /// `true` when the web billing backend is selected and has a key.
    fn is_web_billing_enabled(&self) -> bool;

    /// Fetch the offerings catalog.
    async fn get_offerings(&self) -> OperationResult<Offerings>;

    /// Purchase a package and return the updated customer snapshot.
    async fn purchase_package(&self, package: &Package) -> OperationResult<CustomerInfo>;

    /// Fetch the current customer snapshot.
    async fn get_customer_info(&self) -> OperationResult<CustomerInfo>;

    /// Restore previous purchases. On web this is a plain customer fetch.
    async fn restore_purchases(&self) -> OperationResult<CustomerInfo>;

    /// Identify the current user with the backend.
    async fn set_user_id(&self, app_user_id: &str) -> OperationResult<CustomerInfo>;

    /// Return to an anonymous session.
    async fn logout_user(&self) -> OperationResult<()>;

    /// `true` if the entitlement is currently active.
    async fn has_entitlement(&self, entitlement_id: &str) -> OperationResult<bool>;

    /// `true` if any subscription is currently active.
    async fn has_active_subscription(&self) -> OperationResult<bool>;

    /// Find a package in the current offering. `Ok(None)` when absent.
    async fn get_package(&self, identifier: &str) -> OperationResult<Option<Package>>;
}
