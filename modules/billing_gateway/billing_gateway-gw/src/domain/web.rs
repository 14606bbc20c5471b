//! Web billing backend.
//!
//! Maps the web SDK's catalog shapes onto the gateway models and emulates
//! the calls the web SDK lacks: restore is a plain customer fetch, logout
//! swaps in a new anonymous instance.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use billing_gateway_sdk::{
    BillingSdkError, CustomerInfo, Offering, Offerings, Package, PackageType, StoreProduct, WebBillingConnector,
    WebOffering, WebOfferings, WebPackage, WebPrice, WebProduct, WebPurchaseParams,
};
use secrecy::SecretString;
use tracing::warn;

use super::backend::{BackendError, BackendStatus, BillingBackend};
use super::session::{WebSession, WebSessionState};
use crate::platform::BillingTarget;
use crate::telemetry::LOG_TARGET;

pub struct WebBackend {
    session: Option<WebSession>,
}

impl WebBackend {
    /// Without a key or a connector the backend reports `not_configured`.
    #[must_use]
    pub fn new(
        connector: Option<Arc<dyn WebBillingConnector>>,
        api_key: Option<&SecretString>,
    ) -> Self {
        let session = match (connector, api_key) {
            (Some(connector), Some(key)) => Some(WebSession::new(connector, key.clone())),
            (None, Some(_)) => {
                warn!(target: LOG_TARGET, "web billing key present but no web connector was provided");
                None
            }
            (_, None) => None,
        };
        Self { session }
    }

    fn configured_session(&self) -> Result<&WebSession, BackendError> {
        self.session.as_ref().ok_or(BackendError::NotConfigured)
    }
}

#[async_trait]
impl BillingBackend for WebBackend {
    fn target(&self) -> BillingTarget {
        BillingTarget::Web
    }

    fn is_configured(&self) -> bool {
        self.session.is_some()
    }

    fn status(&self) -> BackendStatus {
        BackendStatus::Web(
            self.session
                .as_ref()
                .map_or(WebSessionState::Uninitialized, WebSession::state),
        )
    }

    async fn get_offerings(&self) -> Result<Offerings, BackendError> {
        let client = self.configured_session()?.client().await?;
        let offerings = client.get_offerings().await?;
        Ok(offerings_from_web(offerings)?)
    }

    async fn purchase_package(&self, package: &Package) -> Result<CustomerInfo, BackendError> {
        let client = self.configured_session()?.client().await?;
        let result = client
            .purchase(WebPurchaseParams {
                rc_package: package_to_web(package),
                customer_email: None,
            })
            .await?;
        Ok(result.customer_info)
    }

    async fn get_customer_info(&self) -> Result<CustomerInfo, BackendError> {
        let client = self.configured_session()?.client().await?;
        Ok(client.get_customer_info().await?)
    }

    async fn restore_purchases(&self) -> Result<CustomerInfo, BackendError> {
        self.get_customer_info().await
    }

    async fn log_in(&self, app_user_id: &str) -> Result<CustomerInfo, BackendError> {
        Ok(self.configured_session()?.identify(app_user_id).await?)
    }

    async fn log_out(&self) -> Result<(), BackendError> {
        self.configured_session()?.reset_anonymous().await?;
        Ok(())
    }
}

/// Convert the web catalog into gateway offerings.
///
/// # Errors
///
/// Returns [`BillingSdkError::InvalidResponse`] if a package or product has
/// no identifier or a product has a negative price.
pub fn offerings_from_web(web: WebOfferings) -> Result<Offerings, BillingSdkError> {
    let all = web
        .all
        .into_values()
        .map(|o| offering_from_web(o).map(|o| (o.identifier.clone(), o)))
        .collect::<Result<HashMap<_, _>, _>>()?;

    Ok(Offerings {
        current: web.current.map(offering_from_web).transpose()?,
        all,
    })
}

fn offering_from_web(web: WebOffering) -> Result<Offering, BillingSdkError> {
    let available_packages = web
        .available_packages
        .into_iter()
        .map(|p| package_from_web(p, &web.identifier))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Offering {
        identifier: web.identifier,
        server_description: web.server_description,
        available_packages,
    })
}

/// Convert one web package, tagging it with its offering.
///
/// # Errors
///
/// Returns [`BillingSdkError::InvalidResponse`] for a package the gateway
/// could not purchase later.
pub fn package_from_web(
    web: WebPackage,
    offering_identifier: &str,
) -> Result<Package, BillingSdkError> {
    let product = web.rc_billing_product;
    if web.identifier.is_empty() || product.identifier.is_empty() {
        return Err(BillingSdkError::invalid_response(format!(
            "web package in offering '{offering_identifier}' has no identifier"
        )));
    }
    if product.current_price.amount_micros < 0 {
        return Err(BillingSdkError::invalid_response(format!(
            "web product '{}' has a negative price",
            product.identifier
        )));
    }

    Ok(Package {
        package_type: PackageType::from_identifier(&web.package_type),
        identifier: web.identifier,
        product: StoreProduct {
            identifier: product.identifier,
            title: product.display_name,
            description: product.description.unwrap_or_default(),
            price_string: product.current_price.formatted_price,
            price_micros: product.current_price.amount_micros,
            currency_code: product.current_price.currency,
        },
        offering_identifier: offering_identifier.to_owned(),
    })
}

/// Convert a gateway package back into the shape the web SDK purchases.
#[must_use]
pub fn package_to_web(package: &Package) -> WebPackage {
    let product = &package.product;
    WebPackage {
        identifier: package.identifier.clone(),
        package_type: web_package_type(package),
        rc_billing_product: WebProduct {
            identifier: product.identifier.clone(),
            display_name: product.title.clone(),
            description: (!product.description.is_empty()).then(|| product.description.clone()),
            current_price: WebPrice {
                amount_micros: product.price_micros,
                currency: product.currency_code.clone(),
                formatted_price: product.price_string.clone(),
            },
        },
    }
}

fn web_package_type(package: &Package) -> String {
    match package.package_type {
        PackageType::Lifetime => "$rc_lifetime".to_owned(),
        PackageType::Annual => "$rc_annual".to_owned(),
        PackageType::SixMonth => "$rc_six_month".to_owned(),
        PackageType::ThreeMonth => "$rc_three_month".to_owned(),
        PackageType::TwoMonth => "$rc_two_month".to_owned(),
        PackageType::Monthly => "$rc_monthly".to_owned(),
        PackageType::Weekly => "$rc_weekly".to_owned(),
        PackageType::Custom | PackageType::Unknown => package.identifier.clone(),
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn web_package(id: &str, kind: &str) -> WebPackage {
        WebPackage {
            identifier: id.to_owned(),
            package_type: kind.to_owned(),
            rc_billing_product: WebProduct {
                identifier: "pro_monthly".to_owned(),
                display_name: "Pro".to_owned(),
                description: None,
                current_price: WebPrice {
                    amount_micros: 4_990_000,
                    currency: "USD".to_owned(),
                    formatted_price: "$4.99".to_owned(),
                },
            },
        }
    }

    #[test]
    fn web_catalog_maps_to_offerings() {
        let offering = WebOffering {
            identifier: "default".to_owned(),
            server_description: "Default offering".to_owned(),
            available_packages: vec![web_package("$rc_monthly", "$rc_monthly")],
        };
        let web = WebOfferings {
            current: Some(offering.clone()),
            all: HashMap::from([("default".to_owned(), offering)]),
        };

        let offerings = offerings_from_web(web).unwrap();
        let package = offerings.current_package("$rc_monthly").unwrap();

        assert_eq!(package.package_type, PackageType::Monthly);
        assert_eq!(package.offering_identifier, "default");
        assert_eq!(package.product.title, "Pro");
        assert_eq!(package.product.price_micros, 4_990_000);
        assert!(package.product.description.is_empty());
        assert!(offerings.all.contains_key("default"));
    }

    #[test]
    fn purchase_shape_keeps_identity_and_price() {
        let package = package_from_web(web_package("team", "team"), "default").unwrap();
        let web = package_to_web(&package);

        assert_eq!(package.package_type, PackageType::Custom);
        assert_eq!(web.identifier, "team");
        assert_eq!(web.package_type, "team");
        assert_eq!(web.rc_billing_product.current_price.formatted_price, "$4.99");
        assert!(web.rc_billing_product.description.is_none());
    }

    #[test]
    fn malformed_web_packages_are_invalid_responses() {
        let unnamed = package_from_web(web_package("", "$rc_monthly"), "default");
        assert!(matches!(unnamed, Err(BillingSdkError::InvalidResponse { .. })));

        let mut negative = web_package("$rc_monthly", "$rc_monthly");
        negative.rc_billing_product.current_price.amount_micros = -1;
        let offering = WebOffering {
            identifier: "default".to_owned(),
            server_description: String::new(),
            available_packages: vec![negative],
        };
        let web = WebOfferings {
            current: Some(offering),
            all: HashMap::new(),
        };

        let err = offerings_from_web(web).unwrap_err();
        assert!(err.to_string().contains("negative price"));
    }

    #[tokio::test]
    async fn missing_key_is_not_configured() {
        let backend = WebBackend::new(None, None);

        assert!(!backend.is_configured());
        assert_eq!(
            backend.status(),
            BackendStatus::Web(WebSessionState::Uninitialized)
        );
        assert!(matches!(
            backend.get_offerings().await,
            Err(BackendError::NotConfigured)
        ));
    }
}
