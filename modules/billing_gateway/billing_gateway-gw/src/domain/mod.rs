//! Domain layer for the billing gateway.

pub mod backend;
pub mod local_client;
pub mod native;
pub mod service;
pub mod session;
pub mod web;

pub use backend::{BackendError, BackendStatus, BillingBackend};
pub use local_client::LocalClient;
pub use native::{NativeBackend, NativeState};
pub use service::{BillingGateway, BillingGatewayBuilder};
pub use session::{WebSession, WebSessionState};
pub use web::WebBackend;
