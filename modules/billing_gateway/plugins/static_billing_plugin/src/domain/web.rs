//! Web billing facade over the static store.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use billing_gateway_sdk::{
    BillingSdkError, CustomerInfo, WebBillingClient, WebBillingConnector, WebOfferings,
    WebPurchaseParams, WebPurchaseResult,
};
use parking_lot::RwLock;
use tracing::debug;

use super::store::StaticStore;

/// Creates [`StaticWebClient`] instances over one shared store.
pub struct StaticWebConnector {
    store: Arc<StaticStore>,
    instances: AtomicUsize,
}

impl StaticWebConnector {
    #[must_use]
    pub fn new(store: Arc<StaticStore>) -> Self {
        Self {
            store,
            instances: AtomicUsize::new(0),
        }
    }

    /// Number of instances configured so far.
    #[must_use]
    pub fn instances(&self) -> usize {
        self.instances.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WebBillingConnector for StaticWebConnector {
    async fn configure(
        &self,
        api_key: &str,
        app_user_id: &str,
    ) -> Result<Arc<dyn WebBillingClient>, BillingSdkError> {
        if api_key.trim().is_empty() {
            return Err(BillingSdkError::configuration("empty API key"));
        }
        self.instances.fetch_add(1, Ordering::SeqCst);
        debug!(app_user_id, "static web billing instance configured");

        Ok(Arc::new(StaticWebClient {
            store: Arc::clone(&self.store),
            app_user_id: RwLock::new(app_user_id.to_owned()),
        }))
    }
}

/// One web billing instance bound to an app user.
pub struct StaticWebClient {
    store: Arc<StaticStore>,
    app_user_id: RwLock<String>,
}

impl StaticWebClient {
    fn user(&self) -> String {
        self.app_user_id.read().clone()
    }
}

#[async_trait]
impl WebBillingClient for StaticWebClient {
    async fn get_offerings(&self) -> Result<WebOfferings, BillingSdkError> {
        Ok(self.store.web_offerings())
    }

    async fn purchase(&self, params: WebPurchaseParams) -> Result<WebPurchaseResult, BillingSdkError> {
        let product = &params.rc_package.rc_billing_product.identifier;
        let customer_info = self.store.purchase(&self.user(), product)?;
        Ok(WebPurchaseResult { customer_info })
    }

    async fn get_customer_info(&self) -> Result<CustomerInfo, BillingSdkError> {
        Ok(self.store.customer_info(&self.user()))
    }

    async fn change_user(&self, app_user_id: &str) -> Result<CustomerInfo, BillingSdkError> {
        *self.app_user_id.write() = app_user_id.to_owned();
        Ok(self.store.customer_info(app_user_id))
    }
}
