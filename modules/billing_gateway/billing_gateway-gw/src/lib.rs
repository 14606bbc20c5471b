//! Billing Gateway Module
//!
//! Single entry point for purchases and entitlement queries on every
//! platform the app ships to.
//!
//! ## Architecture
//!
//! - **Platform resolution**: picks the native store or web billing backend
//!   and its API key from the runtime platform, the build mode and config
//! - **Backends**: the native store SDK is configured once at construction;
//!   the web billing instance is created lazily and replaced on logout
//! - **Guard**: every operation returns an `OperationResult`; backend errors
//!   never escape as anything else
//!
//! ## Usage
//!
//! ```ignore
//! let config = BillingConfig::from_env()?;
//! let gateway = BillingGateway::builder(config)
//!     .web_connector(connector)
//!     .build();
//! let billing: Arc<dyn BillingGatewayClient> = Arc::new(LocalClient::new(Arc::new(gateway)));
//! ```

// Re-export SDK types
pub use billing_gateway_sdk::*;

pub mod config;
#[doc(hidden)]
pub mod domain;
pub mod platform;
pub mod telemetry;

pub use config::{BillingConfig, ConfigError, LoggingConfig};
pub use domain::{BillingGateway, BillingGatewayBuilder, LocalClient};
pub use platform::{BillingTarget, BuildMode, Resolution, RuntimePlatform};
