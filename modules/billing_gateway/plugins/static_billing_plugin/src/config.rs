//! Configuration for the static billing plugin.

use serde::Deserialize;

/// Static billing plugin configuration.
///
/// Describes a fixed catalog (one offering) and which products unlock which
/// entitlements. The plugin keeps purchases in memory only.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaticBillingPluginConfig {
    /// Identifier of the offering reported as current.
    #[serde(default = "default_offering")]
    pub offering: String,

    /// Products in the current offering, one package each.
    ///
    /// Required. An empty list is valid (empty catalog).
    pub products: Vec<StaticProductConfig>,

    /// Entitlement to product mapping.
    #[serde(default)]
    pub entitlements: Vec<StaticEntitlementConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaticProductConfig {
    /// Store product identifier, e.g. `pro_monthly`.
    pub identifier: String,

    /// Package identifier, e.g. `$rc_monthly`.
    pub package: String,

    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Price in millionths of the currency unit.
    pub price_micros: i64,

    #[serde(default = "default_currency")]
    pub currency: String,

    /// Formatted price shown to users, e.g. `$4.99`.
    pub price_string: String,

    /// Whether the product is an auto-renewing subscription.
    #[serde(default = "default_subscription")]
    pub subscription: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaticEntitlementConfig {
    /// Entitlement identifier, e.g. `premium`.
    pub identifier: String,

    /// Products that unlock the entitlement.
    pub products: Vec<String>,
}

fn default_offering() -> String {
    "default".to_owned()
}

fn default_currency() -> String {
    "USD".to_owned()
}

fn default_subscription() -> bool {
    true
}

impl Default for StaticBillingPluginConfig {
    fn default() -> Self {
        Self {
            offering: default_offering(),
            products: Vec::new(),
            entitlements: Vec::new(),
        }
    }
}
