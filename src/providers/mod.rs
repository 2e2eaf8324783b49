//! Provider adapters for the external translation vendors
//!
//! Every vendor goes through the same [`VendorAdapter`]: build one outbound
//! call, send it through the shared transport, and classify whatever comes
//! back into a [`ProviderResult`]. Adapters never retry; fallback belongs to
//! the gateway.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::core::config::{GatewayConfig, ProviderKind, ProviderSpec};
use crate::core::errors::ProviderFailure;
use crate::core::models::{ProviderResult, TranslationRequest};

pub mod google;
pub mod libretranslate;
pub mod mymemory;
pub mod transport;

use transport::{HttpTransport, OutboundCall};

/// Longest vendor body excerpt kept in a failure detail
const DETAIL_LIMIT: usize = 200;

/// A translation backend the gateway can fall back across
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Name used in logs and attempt records
    fn name(&self) -> &str;

    /// Translate a request whose source language is already resolved.
    /// Every failure is reported inside the result.
    async fn translate(&self, request: &TranslationRequest) -> ProviderResult;
}

/// Adapter for one configured vendor
pub struct VendorAdapter {
    spec: ProviderSpec,
    transport: Arc<dyn HttpTransport>,
}

impl VendorAdapter {
    /// Adapter for `spec` sending through the shared `transport`
    pub fn new(spec: ProviderSpec, transport: Arc<dyn HttpTransport>) -> Self {
        Self { spec, transport }
    }

    fn timeout(&self) -> Duration {
        Duration::from_millis(self.spec.timeout_ms)
    }

    /// Vendor payload for `request`, language codes already remapped
    pub fn build_call(&self, request: &TranslationRequest) -> OutboundCall {
        let source = self.spec.language_map.map(&request.source_lang);
        let target = self.spec.language_map.map(&request.target_lang);
        let timeout = self.timeout();

        match self.spec.kind {
            ProviderKind::Google => google::build_call(&self.spec, &request.text, source, target, timeout),
            ProviderKind::MyMemory => {
                mymemory::build_call(&self.spec, &request.text, source, target, timeout)
            }
            ProviderKind::LibreTranslate => {
                libretranslate::build_call(&self.spec, &request.text, source, target, timeout)
            }
        }
    }

    fn extract(&self, payload: &serde_json::Value) -> Result<String, ProviderFailure> {
        match self.spec.kind {
            ProviderKind::Google => google::extract(payload),
            ProviderKind::MyMemory => mymemory::extract(&self.spec, payload),
            ProviderKind::LibreTranslate => libretranslate::extract(payload),
        }
    }

    fn fail(&self, failure: ProviderFailure, payload: Option<serde_json::Value>) -> ProviderResult {
        ProviderResult::failure(self.spec.name.clone(), failure, payload)
    }
}

#[async_trait]
impl TranslationProvider for VendorAdapter {
    fn name(&self) -> &str {
        &self.spec.name
    }

    async fn translate(&self, request: &TranslationRequest) -> ProviderResult {
        let call = self.build_call(request);

        let response = match self.transport.send(call).await {
            Ok(response) => response,
            Err(e) => return self.fail(e.into(), None),
        };

        if !response.is_success() {
            return self.fail(
                ProviderFailure::vendor(response.status, excerpt(&response.body)),
                None,
            );
        }

        let payload: serde_json::Value = match serde_json::from_str(&response.body) {
            Ok(payload) => payload,
            Err(e) => {
                return self.fail(
                    ProviderFailure::invalid(format!("unparseable body: {}", e)),
                    None,
                )
            }
        };

        let text = match self.extract(&payload) {
            Ok(text) => text,
            Err(failure) => return self.fail(failure, Some(payload)),
        };

        if text.trim().is_empty() {
            return self.fail(ProviderFailure::unusable("empty translation"), Some(payload));
        }
        if self.spec.is_sentinel(&text) {
            return self.fail(
                ProviderFailure::unusable(format!("vendor sentinel: {}", text.trim())),
                Some(payload),
            );
        }
        if text.trim() == request.text.trim() {
            return self.fail(
                ProviderFailure::unusable("translation echoes the input"),
                Some(payload),
            );
        }

        ProviderResult::success(self.spec.name.clone(), text, Some(payload))
    }
}

/// Build adapters for every configured provider, in priority order
pub fn build_providers(
    config: &GatewayConfig,
    transport: Arc<dyn HttpTransport>,
) -> Vec<Arc<dyn TranslationProvider>> {
    config
        .providers
        .iter()
        .map(|spec| {
            Arc::new(VendorAdapter::new(spec.clone(), transport.clone())) as Arc<dyn TranslationProvider>
        })
        .collect()
}

fn excerpt(body: &str) -> String {
    let body = body.trim();
    if body.chars().count() <= DETAIL_LIMIT {
        return body.to_string();
    }
    let cut: String = body.chars().take(DETAIL_LIMIT).collect();
    format!("{}...", cut)
}
