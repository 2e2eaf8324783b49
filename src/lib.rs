//! Tradz - translation gateway
//!
//! Forwards a text to an ordered list of translation providers, falling back
//! to the next provider whenever one fails, and returns the first cleaned
//! translation. Ships an axum HTTP API and a small CLI around that core.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod core;
pub mod providers;
pub mod server;

// Re-export key types for convenience
pub use core::{
    config::{GatewayConfig, LanguageCodeMap, ProviderKind, ProviderSpec},
    detector::detect,
    errors::{GatewayError, GatewayErrorKind, ProviderErrorKind},
    gateway::TranslationGateway,
    models::{GatewayOutcome, ProviderAttempt, ProviderResult, TranslationRequest},
    sanitizer::sanitize,
};

pub use providers::{
    transport::{HttpTransport, ReqwestTransport},
    TranslationProvider, VendorAdapter,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
