//! Contract for the web billing SDK.
//!
//! The web SDK is instance-based: [`WebBillingConnector::configure`] yields a
//! [`WebBillingClient`] bound to one app user. It has no logout and no
//! restore; the gateway emulates both. Its catalog shapes differ from the
//! native ones and are mapped by the gateway.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::BillingSdkError;
use crate::models::CustomerInfo;

/// Web catalog as reported by the web SDK.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WebOfferings {
    pub current: Option<WebOffering>,
    pub all: HashMap<String, WebOffering>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WebOffering {
    pub identifier: String,
    pub server_description: String,
    pub available_packages: Vec<WebPackage>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WebPackage {
    pub identifier: String,
    /// Raw package type string, e.g. `$rc_monthly`.
    pub package_type: String,
    pub rc_billing_product: WebProduct,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WebProduct {
    pub identifier: String,
    pub display_name: String,
    pub description: Option<String>,
    pub current_price: WebPrice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebPrice {
    pub amount_micros: i64,
    pub currency: String,
    pub formatted_price: String,
}

/// Parameters of a web purchase.
#[derive(Debug, Clone, PartialEq)]
pub struct WebPurchaseParams {
    pub rc_package: WebPackage,
    pub customer_email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebPurchaseResult {
    pub customer_info: CustomerInfo,
}

/// Factory for web billing instances.
#[async_trait]
pub trait WebBillingConnector: Send + Sync {
    /// Create a web billing instance for `app_user_id`.
    ///
    /// # Errors
    ///
    /// Returns error if the API key is rejected or the backend is unreachable.
    async fn configure(
        &self,
        api_key: &str,
        app_user_id: &str,
    ) -> Result<Arc<dyn WebBillingClient>, BillingSdkError>;
}

/// A configured web billing instance.
#[async_trait]
pub trait WebBillingClient: Send + Sync {
    /// # Errors
    ///
    /// Returns error if the catalog cannot be fetched.
    async fn get_offerings(&self) -> Result<WebOfferings, BillingSdkError>;

    /// # Errors
    ///
    /// Returns error if the card processor declines or the user cancels.
    async fn purchase(&self, params: WebPurchaseParams) -> Result<WebPurchaseResult, BillingSdkError>;

    /// # Errors
    ///
    /// Returns error if the backend cannot be reached.
    async fn get_customer_info(&self) -> Result<CustomerInfo, BillingSdkError>;

    /// Re-bind this instance to another app user.
    ///
    /// # Errors
    ///
    /// Returns error if the backend rejects the identity change.
    async fn change_user(&self, app_user_id: &str) -> Result<CustomerInfo, BillingSdkError>;
}
