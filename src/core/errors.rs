//! Error types for the gateway, its providers and the transport layer

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Why a single provider attempt did not yield a usable translation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderErrorKind {
    /// Network failure or timeout
    Unreachable,
    /// Vendor answered with a non-success status
    VendorError,
    /// Body could not be parsed or lacked the translated text
    InvalidResponse,
    /// Empty text, a vendor sentinel, or the untranslated input echoed back
    NoUsableTranslation,
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderErrorKind::Unreachable => write!(f, "unreachable"),
            ProviderErrorKind::VendorError => write!(f, "vendor_error"),
            ProviderErrorKind::InvalidResponse => write!(f, "invalid_response"),
            ProviderErrorKind::NoUsableTranslation => write!(f, "no_usable_translation"),
        }
    }
}

/// Terminal failure reported to the caller of the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayErrorKind {
    /// Every configured provider was tried and none produced a usable result
    AllProvidersFailed,
}

impl fmt::Display for GatewayErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayErrorKind::AllProvidersFailed => write!(f, "all_providers_failed"),
        }
    }
}

/// A classified provider failure, before it is folded into a `ProviderResult`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderFailure {
    /// Failure class
    pub kind: ProviderErrorKind,
    /// Vendor status, for `VendorError` only
    pub status: Option<u16>,
    /// Human-readable cause
    pub detail: String,
}

impl ProviderFailure {
    /// Failure without a vendor status
    pub fn new(kind: ProviderErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            detail: detail.into(),
        }
    }

    /// Vendor rejected the call with `status`
    pub fn vendor(status: u16, detail: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::VendorError,
            status: Some(status),
            detail: detail.into(),
        }
    }

    /// Body could not be read as a translation
    pub fn invalid(detail: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::InvalidResponse, detail)
    }

    /// Body parsed but holds nothing usable
    pub fn unusable(detail: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::NoUsableTranslation, detail)
    }
}

/// Outbound call failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Call exceeded its timeout
    #[error("Request timeout after {timeout_ms} ms")]
    Timeout {
        /// Configured timeout
        timeout_ms: u64,
    },

    /// Connection, DNS or body read failure
    #[error("Network error: {message}")]
    Network {
        /// Underlying client error
        message: String,
    },
}

impl From<TransportError> for ProviderFailure {
    fn from(err: TransportError) -> Self {
        ProviderFailure::new(ProviderErrorKind::Unreachable, err.to_string())
    }
}

/// Startup and configuration errors. Translation failures are never reported
/// through this type; they are values in `GatewayOutcome`.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// What was wrong
        message: String,
    },

    /// Unknown provider name in the configured list
    #[error("Unknown provider: {name}")]
    UnknownProvider {
        /// Name as configured
        name: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Reqwest error
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl GatewayError {
    /// Configuration error with `message`
    pub fn config(message: impl Into<String>) -> Self {
        GatewayError::ConfigError {
            message: message.into(),
        }
    }
}

/// Result type for gateway setup operations
pub type Result<T> = std::result::Result<T, GatewayError>;
