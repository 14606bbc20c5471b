//! Native store facade over the static store.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use billing_gateway_sdk::{
    BillingSdkError, CustomerInfo, LogInResult, NativeLogHandler, NativeLogLevel,
    NativeStoreClient, Offerings, Package, PurchaseResult, anonymous_app_user_id,
};
use parking_lot::RwLock;

use super::store::StaticStore;

/// In-memory stand-in for the platform store SDK.
///
/// Tracks one current app user for the whole process, like the real native
/// SDK does.
pub struct StaticNativeStore {
    store: Arc<StaticStore>,
    configured: AtomicBool,
    current_user: RwLock<String>,
    log_handler: RwLock<Option<NativeLogHandler>>,
}

impl StaticNativeStore {
    #[must_use]
    pub fn new(store: Arc<StaticStore>) -> Self {
        Self {
            store,
            configured: AtomicBool::new(false),
            current_user: RwLock::new(anonymous_app_user_id()),
            log_handler: RwLock::new(None),
        }
    }

    #[must_use]
    pub fn current_user(&self) -> String {
        self.current_user.read().clone()
    }

    fn log(&self, level: NativeLogLevel, line: &str) {
        if let Some(handler) = self.log_handler.read().as_ref() {
            handler(level, line);
        }
    }

    fn ensure_configured(&self) -> Result<String, BillingSdkError> {
        if self.configured.load(Ordering::Acquire) {
            Ok(self.current_user())
        } else {
            Err(BillingSdkError::configuration("store SDK used before configure"))
        }
    }
}

#[async_trait]
impl NativeStoreClient for StaticNativeStore {
    fn configure(&self, api_key: &str) -> Result<(), BillingSdkError> {
        if api_key.trim().is_empty() {
            return Err(BillingSdkError::configuration("empty API key"));
        }
        self.configured.store(true, Ordering::Release);
        self.log(NativeLogLevel::Info, "static store configured");
        Ok(())
    }

    fn set_log_handler(&self, handler: NativeLogHandler) {
        *self.log_handler.write() = Some(handler);
    }

    async fn get_offerings(&self) -> Result<Offerings, BillingSdkError> {
        self.ensure_configured()?;
        Ok(self.store.offerings())
    }

    async fn purchase_package(&self, package: &Package) -> Result<PurchaseResult, BillingSdkError> {
        let user = self.ensure_configured()?;
        let customer_info = self.store.purchase(&user, &package.product.identifier)?;
        self.log(NativeLogLevel::Debug, "static purchase recorded");
        Ok(PurchaseResult {
            product_identifier: package.product.identifier.clone(),
            customer_info,
        })
    }

    async fn get_customer_info(&self) -> Result<CustomerInfo, BillingSdkError> {
        let user = self.ensure_configured()?;
        Ok(self.store.customer_info(&user))
    }

    async fn restore_purchases(&self) -> Result<CustomerInfo, BillingSdkError> {
        let user = self.ensure_configured()?;
        Ok(self.store.customer_info(&user))
    }

    async fn log_in(&self, app_user_id: &str) -> Result<LogInResult, BillingSdkError> {
        self.ensure_configured()?;
        let created = !self.store.knows(app_user_id);
        *self.current_user.write() = app_user_id.to_owned();
        Ok(LogInResult {
            customer_info: self.store.customer_info(app_user_id),
            created,
        })
    }

    async fn log_out(&self) -> Result<CustomerInfo, BillingSdkError> {
        self.ensure_configured()?;
        let user = anonymous_app_user_id();
        *self.current_user.write() = user.clone();
        Ok(self.store.customer_info(&user))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::config::StaticBillingPluginConfig;
    use billing_gateway_sdk::ANONYMOUS_ID_PREFIX;
    use std::sync::atomic::AtomicUsize;

    fn native() -> StaticNativeStore {
        let store = StaticStore::new(StaticBillingPluginConfig::default()).unwrap();
        StaticNativeStore::new(Arc::new(store))
    }

    #[tokio::test]
    async fn calls_before_configure_fail() {
        let native = native();

        let err = native.get_customer_info().await.unwrap_err();
        assert!(matches!(err, BillingSdkError::Configuration { .. }));
    }

    #[test]
    fn blank_key_is_rejected() {
        assert!(native().configure("  ").is_err());
    }

    #[test]
    fn configure_reports_through_log_handler() {
        let native = native();
        let lines = Arc::new(AtomicUsize::new(0));
        let counter = lines.clone();
        native.set_log_handler(Arc::new(move |_: NativeLogLevel, _: &str| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        native.configure("test_key").unwrap();
        assert_eq!(lines.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn log_out_switches_to_new_anonymous_user() {
        let native = native();
        native.configure("test_key").unwrap();

        let login = native.log_in("alice").await.unwrap();
        assert!(login.created);
        assert_eq!(native.current_user(), "alice");

        let info = native.log_out().await.unwrap();
        assert!(info.original_app_user_id.starts_with(ANONYMOUS_ID_PREFIX));
        assert_eq!(native.current_user(), info.original_app_user_id);
    }
}
