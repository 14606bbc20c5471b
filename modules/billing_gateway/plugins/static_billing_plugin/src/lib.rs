//! Static billing plugin for the billing gateway.
//!
//! In-memory native store and web billing SDKs driven by a fixed catalog.
//! For development builds and tests; purchases always succeed for products
//! in the catalog and are forgotten when the process exits.

pub mod config;
pub mod domain;

pub use config::StaticBillingPluginConfig;
pub use domain::{StaticNativeStore, StaticStore, StaticWebClient, StaticWebConnector};
