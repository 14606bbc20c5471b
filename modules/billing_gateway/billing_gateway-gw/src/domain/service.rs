//! Domain service for the billing gateway.
//!
//! The backend is selected once, at construction, from the resolved platform
//! and key. Every public operation goes through [`BillingGateway::guard`],
//! which turns backend outcomes into an [`OperationResult`].

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use billing_gateway_sdk::{
    CustomerInfo, GuardFailure, NativeStoreClient, Offerings, OperationResult, Package,
    WebBillingConnector,
};
use tracing::{info, warn};

use super::backend::{BackendError, BackendStatus, BillingBackend};
use super::native::NativeBackend;
use super::web::WebBackend;
use crate::config::BillingConfig;
use crate::platform::{BillingTarget, BuildMode, Resolution, RuntimePlatform, resolve};
use crate::telemetry::LOG_TARGET;

/// Billing gateway service.
pub struct BillingGateway {
    resolution: Resolution,
    backend: Arc<dyn BillingBackend>,
    /// `not_configured` is expected in pre-release builds; log it once.
    not_configured_logged: AtomicBool,
}

/// Builder wiring the platform SDKs into a [`BillingGateway`].
pub struct BillingGatewayBuilder {
    config: BillingConfig,
    native_store: Option<Arc<dyn NativeStoreClient>>,
    web_connector: Option<Arc<dyn WebBillingConnector>>,
}

impl BillingGatewayBuilder {
    /// Native store SDK, used on iOS and Android.
    #[must_use]
    pub fn native_store(mut self, client: Arc<dyn NativeStoreClient>) -> Self {
        self.native_store = Some(client);
        self
    }

    /// Web billing SDK, used on every other platform.
    #[must_use]
    pub fn web_connector(mut self, connector: Arc<dyn WebBillingConnector>) -> Self {
        self.web_connector = Some(connector);
        self
    }

    /// Resolve the platform and configure the selected backend.
    ///
    /// Native configuration runs here, synchronously. The web backend is
    /// created lazily on first use.
    #[must_use]
    pub fn build(self) -> BillingGateway {
        let platform = self.config.platform.unwrap_or_else(RuntimePlatform::detect);
        let build_mode = self.config.build_mode.unwrap_or_else(BuildMode::detect);
        let resolution = resolve(platform, build_mode, &self.config);

        info!(
            target: LOG_TARGET,
            platform = %resolution.platform,
            build_mode = %resolution.build_mode,
            backend = %resolution.target,
            api_key_present = resolution.has_api_key(),
            "billing backend selected"
        );

        let backend: Arc<dyn BillingBackend> = match resolution.target {
            BillingTarget::Native => Arc::new(NativeBackend::configure(
                self.native_store,
                resolution.api_key(),
            )),
            BillingTarget::Web => {
                Arc::new(WebBackend::new(self.web_connector, resolution.api_key()))
            }
        };

        BillingGateway::with_backend(resolution, backend)
    }
}

impl BillingGateway {
    #[must_use]
    pub fn builder(config: BillingConfig) -> BillingGatewayBuilder {
        BillingGatewayBuilder {
            config,
            native_store: None,
            web_connector: None,
        }
    }

    /// Gateway over an already constructed backend.
    #[must_use]
    pub fn with_backend(resolution: Resolution, backend: Arc<dyn BillingBackend>) -> Self {
        Self {
            resolution,
            backend,
            not_configured_logged: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    #[must_use]
    pub fn backend_kind(&self) -> BillingTarget {
        self.backend.target()
    }

    #[must_use]
    pub fn backend_status(&self) -> BackendStatus {
        self.backend.status()
    }

    #[must_use]
    pub fn is_billing_enabled(&self) -> bool {
        self.backend.target() == BillingTarget::Native && self.backend.is_configured()
    }

    #[must_use]
    pub fn is_web_billing_enabled(&self) -> bool {
        self.backend.target() == BillingTarget::Web && self.backend.is_configured()
    }

    /// Run one backend action and classify its outcome.
    ///
    /// An unconfigured backend is never called.
    #[tracing::instrument(
        name = "billing.guard",
        skip_all,
        fields(action = action, backend = %self.resolution.target)
    )]
    async fn guard<'a, T, F, Fut>(&'a self, action: &'static str, op: F) -> OperationResult<T>
    where
        F: FnOnce(&'a dyn BillingBackend) -> Fut,
        Fut: Future<Output = Result<T, BackendError>>,
    {
        if !self.backend.is_configured() {
            self.log_not_configured();
            return Err(GuardFailure::not_configured());
        }

        match op(self.backend.as_ref()).await {
            Ok(value) => Ok(value),
            Err(BackendError::Unsupported) => Err(GuardFailure::web_not_supported()),
            Err(BackendError::NotConfigured) => {
                self.log_not_configured();
                Err(GuardFailure::not_configured())
            }
            Err(BackendError::Sdk(e)) => {
                warn!(target: LOG_TARGET, error = %e, "billing backend call failed");
                Err(GuardFailure::sdk(e))
            }
        }
    }

    fn log_not_configured(&self) {
        if !self.not_configured_logged.swap(true, Ordering::Relaxed) {
            info!(
                target: LOG_TARGET,
                backend = %self.resolution.target,
                "billing not configured for this platform and build"
            );
        }
    }

    /// Fetch the offerings catalog.
    ///
    /// # Errors
    ///
    /// `not_configured` without a usable key, `sdk_error` if the backend fails.
    pub async fn get_offerings(&self) -> OperationResult<Offerings> {
        self.guard("get_offerings", |b| b.get_offerings()).await
    }

    /// Purchase a package and return the updated customer snapshot.
    ///
    /// # Errors
    ///
    /// `not_configured` without a usable key, `sdk_error` if the purchase
    /// fails or is cancelled.
    pub async fn purchase_package(&self, package: &Package) -> OperationResult<CustomerInfo> {
        self.guard("purchase_package", |b| b.purchase_package(package))
            .await
    }

    /// Fetch the current customer snapshot.
    ///
    /// # Errors
    ///
    /// `not_configured` without a usable key, `sdk_error` if the backend fails.
    pub async fn get_customer_info(&self) -> OperationResult<CustomerInfo> {
        self.guard("get_customer_info", |b| b.get_customer_info())
            .await
    }

    /// Restore purchases. On web this is a customer fetch.
    ///
    /// # Errors
    ///
    /// `not_configured` without a usable key, `sdk_error` if the backend fails.
    pub async fn restore_purchases(&self) -> OperationResult<CustomerInfo> {
        self.guard("restore_purchases", |b| b.restore_purchases())
            .await
    }

    /// Identify the current user.
    ///
    /// # Errors
    ///
    /// `not_configured` without a usable key, `sdk_error` if the backend
    /// rejects the identity.
    pub async fn set_user_id(&self, app_user_id: &str) -> OperationResult<CustomerInfo> {
        self.guard("set_user_id", |b| b.log_in(app_user_id)).await
    }

    /// Return to an anonymous session.
    ///
    /// # Errors
    ///
    /// `not_configured` without a usable key, `sdk_error` if the backend
    /// fails. On web a failed re-creation leaves the session uninitialized.
    pub async fn logout_user(&self) -> OperationResult<()> {
        self.guard("logout_user", |b| b.log_out()).await
    }

    /// `true` if the entitlement is active in the current snapshot.
    ///
    /// # Errors
    ///
    /// Forwards the `get_customer_info` failure unchanged.
    pub async fn has_entitlement(&self, entitlement_id: &str) -> OperationResult<bool> {
        let info = self.get_customer_info().await?;
        Ok(info.entitlements.is_active(entitlement_id))
    }

    /// `true` if any subscription is active in the current snapshot.
    ///
    /// # Errors
    ///
    /// Forwards the `get_customer_info` failure unchanged.
    pub async fn has_active_subscription(&self) -> OperationResult<bool> {
        let info = self.get_customer_info().await?;
        Ok(!info.active_subscriptions.is_empty())
    }

    /// Package from the current offering, `Ok(None)` if it is not there.
    ///
    /// # Errors
    ///
    /// Forwards the `get_offerings` failure unchanged.
    pub async fn get_package(&self, identifier: &str) -> OperationResult<Option<Package>> {
        let offerings = self.get_offerings().await?;
        Ok(offerings.current_package(identifier).cloned())
    }
}
