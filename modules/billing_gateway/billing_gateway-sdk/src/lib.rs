//! Billing Gateway SDK
//!
//! This crate provides the public API for the `billing_gateway` module:
//!
//! - [`BillingGatewayClient`] - Public API trait for consumers
//! - [`NativeStoreClient`] - Contract for the native in-app-purchase SDK
//! - [`WebBillingConnector`] / [`WebBillingClient`] - Contract for the web billing SDK
//! - Domain models (customer info, entitlements, offerings, packages)
//! - [`OperationResult`] / [`GuardFailure`] / [`GuardReason`] - Operation outcomes
//! - [`BillingSdkError`] - Backend errors
//! - [`anonymous_app_user_id`] - Anonymous app user ID format
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod api;
pub mod backend_native;
pub mod backend_web;
pub mod error;
pub mod identity;
pub mod models;
pub mod result;

// Re-export main types at crate root
pub use api::BillingGatewayClient;
pub use backend_native::{NativeLogHandler, NativeLogLevel, NativeStoreClient};
pub use backend_web::{
    WebBillingClient, WebBillingConnector, WebOffering, WebOfferings, WebPackage, WebPrice,
    WebProduct, WebPurchaseParams, WebPurchaseResult,
};
pub use error::BillingSdkError;
pub use identity::{ANONYMOUS_ID_PREFIX, anonymous_app_user_id};
pub use models::{
    CustomerInfo, EntitlementInfo, EntitlementInfos, LogInResult, Offering, Offerings, Package,
    PackageType, PurchaseResult, StoreProduct,
};
pub use result::{GuardFailure, GuardReason, OperationResult};
