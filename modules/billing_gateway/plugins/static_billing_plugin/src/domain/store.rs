//! In-memory catalog and purchase ledger.
//!
//! Shared by the native and web facades so both report the same customer
//! state for the same app user.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::time::SystemTime;

use anyhow::{Context, bail};
use billing_gateway_sdk::{
    BillingSdkError, CustomerInfo, EntitlementInfo, EntitlementInfos, Offering, Offerings,
    Package, PackageType, StoreProduct, WebOffering, WebOfferings, WebPackage, WebPrice,
    WebProduct,
};
use parking_lot::Mutex;

use crate::config::{StaticBillingPluginConfig, StaticProductConfig};

pub struct StaticStore {
    config: StaticBillingPluginConfig,
    /// Purchased product identifiers per app user.
    ledger: Mutex<HashMap<String, BTreeSet<String>>>,
}

impl StaticStore {
    /// Validate the catalog and build an empty ledger.
    ///
    /// # Errors
    ///
    /// Returns error if a product is listed twice or an entitlement refers to
    /// an unknown product.
    pub fn new(config: StaticBillingPluginConfig) -> anyhow::Result<Self> {
        let mut seen = HashSet::new();
        for product in &config.products {
            if !seen.insert(product.identifier.as_str()) {
                bail!("duplicate product '{}' in static catalog", product.identifier);
            }
        }

        for entitlement in &config.entitlements {
            for product in &entitlement.products {
                if !seen.contains(product.as_str()) {
                    bail!(
                        "entitlement '{}' refers to unknown product '{product}'",
                        entitlement.identifier
                    );
                }
            }
        }

        Ok(Self {
            config,
            ledger: Mutex::new(HashMap::new()),
        })
    }

    /// Build from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns error if the document does not parse or the catalog is invalid.
    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let config: StaticBillingPluginConfig =
            serde_json::from_str(raw).context("invalid static billing plugin config")?;
        Self::new(config)
    }

    #[must_use]
    pub fn offerings(&self) -> Offerings {
        let offering = Offering {
            identifier: self.config.offering.clone(),
            server_description: format!("Static offering '{}'", self.config.offering),
            available_packages: self
                .config
                .products
                .iter()
                .map(|p| self.package(p))
                .collect(),
        };
        Offerings {
            all: HashMap::from([(offering.identifier.clone(), offering.clone())]),
            current: Some(offering),
        }
    }

    #[must_use]
    pub fn web_offerings(&self) -> WebOfferings {
        let offering = WebOffering {
            identifier: self.config.offering.clone(),
            server_description: format!("Static offering '{}'", self.config.offering),
            available_packages: self.config.products.iter().map(web_package).collect(),
        };
        WebOfferings {
            all: HashMap::from([(offering.identifier.clone(), offering.clone())]),
            current: Some(offering),
        }
    }

    /// Record a purchase of `product_id` for `app_user_id`.
    ///
    /// # Errors
    ///
    /// Returns a store error for products outside the catalog.
    pub fn purchase(&self, app_user_id: &str, product_id: &str) -> Result<CustomerInfo, BillingSdkError> {
        if self.product(product_id).is_none() {
            return Err(BillingSdkError::store(format!(
                "product '{product_id}' is not in the catalog"
            )));
        }

        self.ledger
            .lock()
            .entry(app_user_id.to_owned())
            .or_default()
            .insert(product_id.to_owned());
        Ok(self.customer_info(app_user_id))
    }

    /// `true` if the user has made at least one purchase.
    #[must_use]
    pub fn knows(&self, app_user_id: &str) -> bool {
        self.ledger.lock().contains_key(app_user_id)
    }

    #[must_use]
    pub fn customer_info(&self, app_user_id: &str) -> CustomerInfo {
        let purchased = self
            .ledger
            .lock()
            .get(app_user_id)
            .cloned()
            .unwrap_or_default();

        let mut entitlements = EntitlementInfos::default();
        for entitlement in &self.config.entitlements {
            let unlocked_by = entitlement
                .products
                .iter()
                .find(|p| purchased.contains(p.as_str()));
            let renews = unlocked_by
                .and_then(|p| self.product(p))
                .is_some_and(|p| p.subscription);
            entitlements.insert(EntitlementInfo {
                identifier: entitlement.identifier.clone(),
                is_active: unlocked_by.is_some(),
                product_identifier: unlocked_by.cloned().unwrap_or_default(),
                will_renew: renews,
                expiration_date: None,
            });
        }

        let active_subscriptions = purchased
            .iter()
            .filter(|id| self.product(id).is_some_and(|p| p.subscription))
            .cloned()
            .collect();

        CustomerInfo {
            original_app_user_id: app_user_id.to_owned(),
            entitlements,
            active_subscriptions,
            all_purchased_product_identifiers: purchased,
            request_date: SystemTime::now(),
        }
    }

    fn product(&self, identifier: &str) -> Option<&StaticProductConfig> {
        self.config
            .products
            .iter()
            .find(|p| p.identifier == identifier)
    }

    fn package(&self, product: &StaticProductConfig) -> Package {
        Package {
            identifier: product.package.clone(),
            package_type: PackageType::from_identifier(&product.package),
            product: StoreProduct {
                identifier: product.identifier.clone(),
                title: product.title.clone(),
                description: product.description.clone(),
                price_string: product.price_string.clone(),
                price_micros: product.price_micros,
                currency_code: product.currency.clone(),
            },
            offering_identifier: self.config.offering.clone(),
        }
    }
}

fn web_package(product: &StaticProductConfig) -> WebPackage {
    WebPackage {
        identifier: product.package.clone(),
        package_type: product.package.clone(),
        rc_billing_product: WebProduct {
            identifier: product.identifier.clone(),
            display_name: product.title.clone(),
            description: (!product.description.is_empty()).then(|| product.description.clone()),
            current_price: WebPrice {
                amount_micros: product.price_micros,
                currency: product.currency.clone(),
                formatted_price: product.price_string.clone(),
            },
        },
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    const CATALOG: &str = r#"
        {
            "products": [
                { "identifier": "pro_monthly", "package": "$rc_monthly", "title": "Pro",
                  "price_micros": 4990000, "price_string": "$4.99" },
                { "identifier": "pro_lifetime", "package": "$rc_lifetime", "title": "Pro Forever",
                  "price_micros": 49990000, "price_string": "$49.99", "subscription": false }
            ],
            "entitlements": [
                { "identifier": "premium", "products": ["pro_monthly", "pro_lifetime"] }
            ]
        }
    "#;

    #[test]
    fn purchase_grants_entitlement() {
        let store = StaticStore::from_json(CATALOG).unwrap();

        let before = store.customer_info("alice");
        assert!(!before.entitlements.is_active("premium"));

        let after = store.purchase("alice", "pro_monthly").unwrap();
        assert!(after.entitlements.is_active("premium"));
        assert!(after.active_subscriptions.contains("pro_monthly"));
        assert!(!store.customer_info("bob").entitlements.is_active("premium"));
    }

    #[test]
    fn lifetime_purchase_is_not_a_subscription() {
        let store = StaticStore::from_json(CATALOG).unwrap();

        let info = store.purchase("alice", "pro_lifetime").unwrap();
        assert!(info.entitlements.is_active("premium"));
        assert!(info.active_subscriptions.is_empty());
        assert!(info.all_purchased_product_identifiers.contains("pro_lifetime"));
    }

    #[test]
    fn unknown_product_is_a_store_error() {
        let store = StaticStore::from_json(CATALOG).unwrap();

        let err = store.purchase("alice", "gold_bar").unwrap_err();
        assert!(matches!(err, BillingSdkError::Store { .. }));
        assert!(!store.knows("alice"));
    }

    #[test]
    fn entitlement_with_unknown_product_is_rejected() {
        let raw = r#"
            {
                "products": [],
                "entitlements": [{ "identifier": "premium", "products": ["ghost"] }]
            }
        "#;
        let err = StaticStore::from_json(raw).err().unwrap();
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn both_catalog_shapes_list_the_same_packages() {
        let store = StaticStore::from_json(CATALOG).unwrap();

        let native = store.offerings();
        let web = store.web_offerings();
        let monthly = native.current_package("$rc_monthly").unwrap();

        assert_eq!(monthly.package_type, PackageType::Monthly);
        assert_eq!(
            web.current.unwrap().available_packages.len(),
            native.current.unwrap().available_packages.len()
        );
    }
}
