//! Logging for the billing gateway.
//!
//! All gateway events use the [`LOG_TARGET`] target so hosts can filter them
//! (`RUST_LOG=billing_gateway=debug`). The native store SDK's own log lines
//! are forwarded into the same target through [`native_log_handler`].

use std::sync::Arc;

use billing_gateway_sdk::{NativeLogHandler, NativeLogLevel};
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Tracing target of every event the gateway emits.
pub const LOG_TARGET: &str = "billing_gateway";

/// Install a global `fmt` subscriber.
///
/// `RUST_LOG` wins over `config.level`. Returns `false` if the host already
/// installed a subscriber, in which case the gateway logs through it.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = if config.json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    };

    if !installed {
        tracing::debug!(target: LOG_TARGET, "tracing subscriber already installed");
    }
    installed
}

/// Handler that forwards native SDK log lines into tracing.
#[must_use]
pub fn native_log_handler() -> NativeLogHandler {
    Arc::new(forward_native_line)
}

fn forward_native_line(level: NativeLogLevel, line: &str) {
    match level {
        NativeLogLevel::Error => {
            tracing::error!(target: LOG_TARGET, source = "native_sdk", "{line}");
        }
        NativeLogLevel::Warn => {
            tracing::warn!(target: LOG_TARGET, source = "native_sdk", "{line}");
        }
        NativeLogLevel::Info => {
            tracing::info!(target: LOG_TARGET, source = "native_sdk", "{line}");
        }
        NativeLogLevel::Debug => {
            tracing::debug!(target: LOG_TARGET, source = "native_sdk", "{line}");
        }
        NativeLogLevel::Verbose => {
            tracing::trace!(target: LOG_TARGET, source = "native_sdk", "{line}");
        }
    }
}
