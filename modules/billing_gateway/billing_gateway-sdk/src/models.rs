//! Domain models for billing.
//!
//! These models are transport-agnostic (no serde) and mirror the shapes the
//! native store SDK reports. The web backend has its own shapes (see
//! [`crate::backend_web`]) which the gateway maps onto these.

use std::collections::{BTreeSet, HashMap};
use std::time::SystemTime;

/// Snapshot of a user's purchase and entitlement state as reported by a backend.
///
/// Never cached by the gateway; every query re-fetches it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerInfo {
    /// App user ID the snapshot belongs to (anonymous or identified).
    pub original_app_user_id: String,
    /// Entitlements known for this user, active or not.
    pub entitlements: EntitlementInfos,
    /// Product identifiers of currently active subscriptions.
    pub active_subscriptions: BTreeSet<String>,
    /// Every product identifier the user has ever purchased.
    pub all_purchased_product_identifiers: BTreeSet<String>,
    /// Time the backend produced the snapshot.
    pub request_date: SystemTime,
}

impl CustomerInfo {
    /// Empty snapshot for a user with no purchases.
    #[must_use]
    pub fn empty(app_user_id: impl Into<String>) -> Self {
        Self {
            original_app_user_id: app_user_id.into(),
            entitlements: EntitlementInfos::default(),
            active_subscriptions: BTreeSet::new(),
            all_purchased_product_identifiers: BTreeSet::new(),
            request_date: SystemTime::now(),
        }
    }
}

/// Entitlements keyed by identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntitlementInfos {
    pub all: HashMap<String, EntitlementInfo>,
}

impl EntitlementInfos {
    /// Returns `true` if the entitlement exists and is active.
    #[must_use]
    pub fn is_active(&self, identifier: &str) -> bool {
        self.all.get(identifier).is_some_and(|e| e.is_active)
    }

    pub fn insert(&mut self, info: EntitlementInfo) {
        self.all.insert(info.identifier.clone(), info);
    }
}

/// A single right-to-access flag (e.g. "premium").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitlementInfo {
    pub identifier: String,
    pub is_active: bool,
    /// Product that unlocked the entitlement.
    pub product_identifier: String,
    pub will_renew: bool,
    /// `None` for lifetime entitlements.
    pub expiration_date: Option<SystemTime>,
}

/// Backend-curated catalog of offerings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Offerings {
    /// Offering the backend wants presented to this user, if any.
    pub current: Option<Offering>,
    /// All offerings keyed by identifier.
    pub all: HashMap<String, Offering>,
}

impl Offerings {
    /// Looks up a package by identifier in the current offering.
    #[must_use]
    pub fn current_package(&self, identifier: &str) -> Option<&Package> {
        self.current
            .as_ref()
            .and_then(|offering| offering.package(identifier))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Offering {
    pub identifier: String,
    pub server_description: String,
    pub available_packages: Vec<Package>,
}

impl Offering {
    #[must_use]
    pub fn package(&self, identifier: &str) -> Option<&Package> {
        self.available_packages
            .iter()
            .find(|p| p.identifier == identifier)
    }
}

/// One purchasable unit within an offering.
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    /// Package identifier, e.g. `$rc_monthly`.
    pub identifier: String,
    pub package_type: PackageType,
    pub product: StoreProduct,
    pub offering_identifier: String,
}

/// Well-known package durations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageType {
    Lifetime,
    Annual,
    SixMonth,
    ThreeMonth,
    TwoMonth,
    Monthly,
    Weekly,
    Custom,
    Unknown,
}

impl PackageType {
    /// Parses the wire identifier used by billing backends.
    #[must_use]
    pub fn from_identifier(raw: &str) -> Self {
        match raw {
            "$rc_lifetime" | "LIFETIME" => Self::Lifetime,
            "$rc_annual" | "ANNUAL" => Self::Annual,
            "$rc_six_month" | "SIX_MONTH" => Self::SixMonth,
            "$rc_three_month" | "THREE_MONTH" => Self::ThreeMonth,
            "$rc_two_month" | "TWO_MONTH" => Self::TwoMonth,
            "$rc_monthly" | "MONTHLY" => Self::Monthly,
            "$rc_weekly" | "WEEKLY" => Self::Weekly,
            "CUSTOM" => Self::Custom,
            other if !other.starts_with("$rc_") && !other.is_empty() => Self::Custom,
            _ => Self::Unknown,
        }
    }
}

/// Store product backing a package.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreProduct {
    pub identifier: String,
    pub title: String,
    pub description: String,
    /// Localized, formatted price (e.g. `$4.99`).
    pub price_string: String,
    /// Price in millionths of the currency unit.
    pub price_micros: i64,
    pub currency_code: String,
}

/// Native purchase response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseResult {
    pub product_identifier: String,
    pub customer_info: CustomerInfo,
}

/// Native log-in response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogInResult {
    pub customer_info: CustomerInfo,
    /// `true` if the backend created a new user record.
    pub created: bool,
}
