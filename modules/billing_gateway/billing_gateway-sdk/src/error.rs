//! Error types reported by billing backends.

use thiserror::Error;

/// Errors raised by a billing backend SDK (native store or web billing).
///
/// The gateway never returns these directly; they travel inside
/// [`GuardFailure`](crate::GuardFailure) as the diagnostic cause of an
/// `sdk_error`.
#[derive(Debug, Error)]
pub enum BillingSdkError {
    /// The backend could not be reached
    #[error("Network error: {message}")]
    Network {
        /// Error message
        message: String,
        /// Underlying transport error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The store rejected the request (payment declined, product unavailable)
    #[error("Store error: {message}")]
    Store {
        /// Error message
        message: String,
        /// Source error from the store
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The user dismissed the purchase flow
    #[error("Purchase cancelled by user")]
    PurchaseCancelled,

    /// The backend answered with data the SDK could not interpret
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// Description of the malformed data
        message: String,
    },

    /// The SDK refused its configuration (bad API key, wrong platform)
    #[error("Configuration rejected: {message}")]
    Configuration {
        /// Error message
        message: String,
    },
}

impl BillingSdkError {
    /// Create a network error with a message only.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
        }
    }

    /// Create a network error with a source error.
    pub fn network_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Network {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a store error with a message only.
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
            source: None,
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Returns `true` when the user backed out of the purchase flow.
    #[must_use]
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::PurchaseCancelled)
    }
}
