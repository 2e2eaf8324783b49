//! Core data models for the gateway

use serde::{Deserialize, Serialize};

use crate::core::errors::{GatewayErrorKind, ProviderErrorKind, ProviderFailure};

/// Source language marker that asks the gateway to detect the language
pub const AUTO_LANG: &str = "auto";

/// Target language used when the caller does not name one
pub const DEFAULT_TARGET_LANG: &str = "en";

/// Canonical language codes the gateway advertises, with display names
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("pt", "Português"),
    ("en", "English"),
    ("es", "Español"),
    ("fr", "Français"),
    ("de", "Deutsch"),
    ("it", "Italiano"),
    ("nl", "Nederlands"),
    ("ru", "Русский"),
    ("ja", "日本語"),
    ("ko", "한국어"),
    ("zh", "中文"),
    ("ar", "العربية"),
    ("he", "עברית"),
];

/// Translation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRequest {
    /// Text to translate
    pub text: String,
    /// Source language or `"auto"`
    pub source_lang: String,
    /// Target language
    pub target_lang: String,
}

impl TranslationRequest {
    /// New request with source language detection
    pub fn new(text: impl Into<String>, target_lang: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_lang: AUTO_LANG.to_string(),
            target_lang: target_lang.into(),
        }
    }

    /// Set an explicit source language
    pub fn with_source_lang(mut self, source_lang: impl Into<String>) -> Self {
        self.source_lang = source_lang.into();
        self
    }

    /// Whether the source language should be detected
    pub fn wants_detection(&self) -> bool {
        let source = self.source_lang.trim();
        source.is_empty() || source.eq_ignore_ascii_case(AUTO_LANG)
    }
}

/// Result of one provider attempt
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResult {
    /// Provider name
    pub provider: String,
    /// Whether a translation was produced
    pub ok: bool,
    /// Unsanitized vendor text, empty on failure
    pub translated_text: String,
    /// Parsed vendor body, when there was one
    pub raw_payload: Option<serde_json::Value>,
    /// Failure class, `None` on success
    pub error_kind: Option<ProviderErrorKind>,
    /// Vendor status for `VendorError`
    pub status: Option<u16>,
    /// Failure cause
    pub detail: Option<String>,
}

impl ProviderResult {
    /// Successful attempt
    pub fn success(
        provider: impl Into<String>,
        translated_text: impl Into<String>,
        raw_payload: Option<serde_json::Value>,
    ) -> Self {
        Self {
            provider: provider.into(),
            ok: true,
            translated_text: translated_text.into(),
            raw_payload,
            error_kind: None,
            status: None,
            detail: None,
        }
    }

    /// Failed attempt
    pub fn failure(
        provider: impl Into<String>,
        failure: ProviderFailure,
        raw_payload: Option<serde_json::Value>,
    ) -> Self {
        Self {
            provider: provider.into(),
            ok: false,
            translated_text: String::new(),
            raw_payload,
            error_kind: Some(failure.kind),
            status: failure.status,
            detail: Some(failure.detail),
        }
    }
}

/// Record of one attempt, kept for observability only
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderAttempt {
    /// Provider name
    pub provider: String,
    /// `None` when the attempt won
    pub error_kind: Option<ProviderErrorKind>,
    /// Vendor status for `VendorError`
    pub status: Option<u16>,
    /// Failure cause
    pub detail: Option<String>,
    /// Wall time spent on the attempt
    pub elapsed_ms: u64,
}

impl ProviderAttempt {
    /// A vendor 4xx rejection, other than timeouts and throttling
    pub fn is_client_rejection(&self) -> bool {
        self.error_kind == Some(ProviderErrorKind::VendorError)
            && matches!(self.status, Some(code) if (400..500).contains(&code) && code != 408 && code != 429)
    }
}

/// Terminal value returned by the gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayOutcome {
    /// Blank input; nothing was sent to any provider
    EmptyInput,
    /// A provider produced a usable, sanitized translation
    Translated {
        /// Sanitized translation
        text: String,
        /// Source language used, detected or given
        source_lang: String,
        /// Provider that won
        provider: String,
        /// Every attempt made, the winner last
        attempts: Vec<ProviderAttempt>,
    },
    /// No provider produced a usable translation
    Failed {
        /// Failure class
        kind: GatewayErrorKind,
        /// Per-provider summary
        detail: String,
        /// Every attempt made
        attempts: Vec<ProviderAttempt>,
    },
}

impl GatewayOutcome {
    /// Translated text, `""` for blank input, `None` on failure
    pub fn translated_text(&self) -> Option<&str> {
        match self {
            GatewayOutcome::EmptyInput => Some(""),
            GatewayOutcome::Translated { text, .. } => Some(text.as_str()),
            GatewayOutcome::Failed { .. } => None,
        }
    }

    /// Error kind of a failed outcome
    pub fn error_kind(&self) -> Option<GatewayErrorKind> {
        match self {
            GatewayOutcome::Failed { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Attempts in the order they were made
    pub fn attempts(&self) -> &[ProviderAttempt] {
        match self {
            GatewayOutcome::EmptyInput => &[],
            GatewayOutcome::Translated { attempts, .. } | GatewayOutcome::Failed { attempts, .. } => {
                attempts.as_slice()
            }
        }
    }

    /// True when the failure was caused by the request itself, i.e. every
    /// provider rejected it with a 4xx status
    pub fn is_client_fault(&self) -> bool {
        match self {
            GatewayOutcome::Failed { attempts, .. } => {
                !attempts.is_empty() && attempts.iter().all(ProviderAttempt::is_client_rejection)
            }
            _ => false,
        }
    }
}
