//! Outcome type for every gateway operation.
//!
//! Billing outcomes cross the gateway boundary only as [`OperationResult`]:
//! either the value, or a [`GuardFailure`] carrying one of three closed
//! [`GuardReason`]s. Callers branch on the reason; the wrapped SDK error is
//! for diagnostics only.

use std::fmt;

use thiserror::Error;

use crate::error::BillingSdkError;

/// Result of a guarded billing operation.
pub type OperationResult<T> = Result<T, GuardFailure>;

/// Closed set of failure reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuardReason {
    /// The action has no web equivalent.
    WebNotSupported,
    /// No usable API key for the current platform/build, or the native SDK
    /// refused its configuration.
    NotConfigured,
    /// The backend accepted the call but it failed.
    SdkError,
}

impl GuardReason {
    /// Stable wire name (`web_not_supported`, `not_configured`, `sdk_error`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WebNotSupported => "web_not_supported",
            Self::NotConfigured => "not_configured",
            Self::SdkError => "sdk_error",
        }
    }
}

impl fmt::Display for GuardReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure half of [`OperationResult`].
#[derive(Debug, Error)]
#[error("billing operation failed: {reason}")]
pub struct GuardFailure {
    reason: GuardReason,
    #[source]
    error: Option<BillingSdkError>,
}

impl GuardFailure {
    #[must_use]
    pub fn not_configured() -> Self {
        Self {
            reason: GuardReason::NotConfigured,
            error: None,
        }
    }

    #[must_use]
    pub fn web_not_supported() -> Self {
        Self {
            reason: GuardReason::WebNotSupported,
            error: None,
        }
    }

    #[must_use]
    pub fn sdk(error: BillingSdkError) -> Self {
        Self {
            reason: GuardReason::SdkError,
            error: Some(error),
        }
    }

    #[must_use]
    pub fn reason(&self) -> GuardReason {
        self.reason
    }

    /// The backend error behind an `sdk_error`, if any.
    #[must_use]
    pub fn sdk_error(&self) -> Option<&BillingSdkError> {
        self.error.as_ref()
    }

    #[must_use]
    pub fn into_sdk_error(self) -> Option<BillingSdkError> {
        self.error
    }
}
