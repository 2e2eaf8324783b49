//! Translation gateway with priority-ordered provider fallback

use std::sync::Arc;
use std::time::Instant;

use crate::core::config::GatewayConfig;
use crate::core::detector;
use crate::core::errors::{GatewayErrorKind, ProviderErrorKind, Result};
use crate::core::models::{GatewayOutcome, ProviderAttempt, TranslationRequest};
use crate::core::sanitizer::sanitize;
use crate::providers::transport::{HttpTransport, ReqwestTransport};
use crate::providers::{build_providers, TranslationProvider};

/// Detects the source language, walks the providers in order and returns the
/// first sanitized, non-empty translation.
///
/// The gateway holds no mutable state; clones share the same providers.
#[derive(Clone)]
pub struct TranslationGateway {
    providers: Arc<Vec<Arc<dyn TranslationProvider>>>,
}

impl TranslationGateway {
    /// Gateway over an explicit provider list, highest priority first
    pub fn new(providers: Vec<Arc<dyn TranslationProvider>>) -> Self {
        Self {
            providers: Arc::new(providers),
        }
    }

    /// Gateway for a configuration, sending through `transport`
    pub fn with_transport(config: &GatewayConfig, transport: Arc<dyn HttpTransport>) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(build_providers(config, transport)))
    }

    /// Gateway for a configuration over a pooled `reqwest` client
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        let transport = Arc::new(ReqwestTransport::new()?);
        Self::with_transport(config, transport)
    }

    /// Create from environment
    pub fn from_env() -> Result<Self> {
        let config = GatewayConfig::from_env()?;
        Self::from_config(&config)
    }

    /// Provider names in priority order
    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    /// Translate a request.
    ///
    /// Blank text short-circuits to [`GatewayOutcome::EmptyInput`] without
    /// touching any provider. Each provider is tried at most once.
    pub async fn translate_text(&self, request: &TranslationRequest) -> GatewayOutcome {
        if request.text.trim().is_empty() {
            return GatewayOutcome::EmptyInput;
        }

        let source_lang = if request.wants_detection() {
            detector::detect(&request.text).to_string()
        } else {
            request.source_lang.clone()
        };
        let resolved = TranslationRequest {
            text: request.text.clone(),
            source_lang: source_lang.clone(),
            target_lang: request.target_lang.clone(),
        };

        let mut attempts = Vec::with_capacity(self.providers.len());

        for provider in self.providers.iter() {
            let started = Instant::now();
            let result = provider.translate(&resolved).await;
            let elapsed_ms = started.elapsed().as_millis() as u64;

            if result.ok {
                let text = sanitize(&result.translated_text);
                if !text.is_empty() {
                    attempts.push(ProviderAttempt {
                        provider: result.provider,
                        error_kind: None,
                        status: None,
                        detail: None,
                        elapsed_ms,
                    });
                    return GatewayOutcome::Translated {
                        text,
                        source_lang,
                        provider: provider.name().to_string(),
                        attempts,
                    };
                }
                attempts.push(ProviderAttempt {
                    provider: result.provider,
                    error_kind: Some(ProviderErrorKind::NoUsableTranslation),
                    status: None,
                    detail: Some("translation is empty after sanitization".to_string()),
                    elapsed_ms,
                });
                continue;
            }

            attempts.push(ProviderAttempt {
                provider: result.provider,
                error_kind: result.error_kind,
                status: result.status,
                detail: result.detail,
                elapsed_ms,
            });
        }

        let detail = if attempts.is_empty() {
            "no translation providers configured".to_string()
        } else {
            attempts
                .iter()
                .map(|a| match a.error_kind {
                    Some(kind) => format!("{}: {}", a.provider, kind),
                    None => a.provider.clone(),
                })
                .collect::<Vec<_>>()
                .join(", ")
        };

        GatewayOutcome::Failed {
            kind: GatewayErrorKind::AllProvidersFailed,
            detail,
            attempts,
        }
    }
}
