//! MyMemory translation memory API

use std::time::Duration;

use crate::core::config::ProviderSpec;
use crate::core::errors::ProviderFailure;
use crate::providers::transport::OutboundCall;

/// GET call with `q` and `langpair`, plus `de` and `key` when configured
pub fn build_call(
    spec: &ProviderSpec,
    text: &str,
    source: &str,
    target: &str,
    timeout: Duration,
) -> OutboundCall {
    let mut call = OutboundCall::get(&spec.endpoint, timeout)
        .query("q", text)
        .query("langpair", format!("{}|{}", source, target));
    if let Some(email) = &spec.contact_email {
        call = call.query("de", email.clone());
    }
    if let Some(key) = &spec.api_key {
        call = call.query("key", key.clone());
    }
    call
}

/// `responseStatus` is a number on success and sometimes a string on errors
fn response_status(payload: &serde_json::Value) -> Option<u16> {
    let status = payload.get("responseStatus")?;
    status
        .as_u64()
        .and_then(|s| u16::try_from(s).ok())
        .or_else(|| status.as_str().and_then(|s| s.trim().parse().ok()))
}

/// Translated text from a MyMemory payload.
///
/// Sentinels arrive with an in-body `responseStatus` of 403, so they are
/// matched before the in-body status is applied.
pub fn extract(spec: &ProviderSpec, payload: &serde_json::Value) -> Result<String, ProviderFailure> {
    let text = payload["responseData"]["translatedText"].as_str();
    let details = payload.get("responseDetails").and_then(|d| d.as_str());
    if let Some(sentinel) = text.into_iter().chain(details).find(|s| spec.is_sentinel(s)) {
        return Err(ProviderFailure::unusable(format!(
            "vendor sentinel: {}",
            sentinel.trim()
        )));
    }

    if let Some(status) = response_status(payload) {
        if status != 200 {
            let detail = payload
                .get("responseDetails")
                .and_then(|d| d.as_str())
                .filter(|d| !d.is_empty())
                .or(text)
                .unwrap_or("rejected by vendor");
            return Err(ProviderFailure::vendor(status, detail));
        }
    }

    text.map(|s| s.to_string())
        .ok_or_else(|| ProviderFailure::invalid("no responseData.translatedText in response"))
}
