//! Local client implementation of the gateway API.

use std::sync::Arc;

use async_trait::async_trait;
use billing_gateway_sdk::{BillingGatewayClient, CustomerInfo, Offerings, OperationResult, Package};

use super::service::BillingGateway;

/// Local implementation of the billing gateway client.
///
/// Wraps the domain service so consumers can hold an
/// `Arc<dyn BillingGatewayClient>`.
pub struct LocalClient {
    service: Arc<BillingGateway>,
}

impl LocalClient {
    #[must_use]
    pub fn new(service: Arc<BillingGateway>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl BillingGatewayClient for LocalClient {
    fn is_billing_enabled(&self) -> bool {
        self.service.is_billing_enabled()
    }

    fn is_web_billing_enabled(&self) -> bool {
        self.service.is_web_billing_enabled()
    }

    async fn get_offerings(&self) -> OperationResult<Offerings> {
        self.service.get_offerings().await
    }

    #[tracing::instrument(skip_all, fields(package = %package.identifier))]
    async fn purchase_package(&self, package: &Package) -> OperationResult<CustomerInfo> {
        self.service.purchase_package(package).await
    }

    async fn get_customer_info(&self) -> OperationResult<CustomerInfo> {
        self.service.get_customer_info().await
    }

    async fn restore_purchases(&self) -> OperationResult<CustomerInfo> {
        self.service.restore_purchases().await
    }

    #[tracing::instrument(skip_all)]
    async fn set_user_id(&self, app_user_id: &str) -> OperationResult<CustomerInfo> {
        self.service.set_user_id(app_user_id).await
    }

    async fn logout_user(&self) -> OperationResult<()> {
        self.service.logout_user().await
    }

    #[tracing::instrument(skip_all, fields(entitlement = %entitlement_id))]
    async fn has_entitlement(&self, entitlement_id: &str) -> OperationResult<bool> {
        self.service.has_entitlement(entitlement_id).await
    }

    async fn has_active_subscription(&self) -> OperationResult<bool> {
        self.service.has_active_subscription().await
    }

    #[tracing::instrument(skip_all, fields(package = %identifier))]
    async fn get_package(&self, identifier: &str) -> OperationResult<Option<Package>> {
        self.service.get_package(identifier).await
    }
}
