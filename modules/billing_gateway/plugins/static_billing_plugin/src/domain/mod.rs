//! Domain layer for the static billing plugin.

pub mod native;
pub mod store;
pub mod web;

pub use native::StaticNativeStore;
pub use store::StaticStore;
pub use web::{StaticWebClient, StaticWebConnector};
