//! LibreTranslate `/translate` endpoint (POST, JSON body)

use std::time::Duration;

use crate::core::config::ProviderSpec;
use crate::core::errors::ProviderFailure;
use crate::providers::transport::OutboundCall;

/// POST call with a plain-text JSON body
pub fn build_call(
    spec: &ProviderSpec,
    text: &str,
    source: &str,
    target: &str,
    timeout: Duration,
) -> OutboundCall {
    let mut body = serde_json::json!({
        "q": text,
        "source": source,
        "target": target,
        "format": "text",
    });
    if let Some(key) = &spec.api_key {
        if let Some(obj) = body.as_object_mut() {
            obj.insert("api_key".to_string(), serde_json::json!(key));
        }
    }
    OutboundCall::post_json(&spec.endpoint, body, timeout)
}

/// `translatedText`, or a failure when the body carries `error`
pub fn extract(payload: &serde_json::Value) -> Result<String, ProviderFailure> {
    if let Some(error) = payload.get("error").and_then(|e| e.as_str()) {
        return Err(ProviderFailure::invalid(format!("vendor error in body: {}", error)));
    }
    payload["translatedText"]
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| ProviderFailure::invalid("no translatedText in response"))
}
