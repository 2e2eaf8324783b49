//! Google Translate free web endpoint (`client=gtx`)
//!
//! The response is a nested array; the first element holds one
//! `[translated, original, ...]` segment per sentence.

use std::time::Duration;

use crate::core::config::ProviderSpec;
use crate::core::errors::ProviderFailure;
use crate::providers::transport::OutboundCall;

/// GET call on the `gtx` client with `sl`, `tl` and `q`
pub fn build_call(
    spec: &ProviderSpec,
    text: &str,
    source: &str,
    target: &str,
    timeout: Duration,
) -> OutboundCall {
    OutboundCall::get(&spec.endpoint, timeout)
        .query("client", "gtx")
        .query("sl", source)
        .query("tl", target)
        .query("dt", "t")
        .query("q", text)
}

/// Concatenated sentence segments
pub fn extract(payload: &serde_json::Value) -> Result<String, ProviderFailure> {
    let segments = payload
        .get(0)
        .and_then(|s| s.as_array())
        .ok_or_else(|| ProviderFailure::invalid("no sentence segments in response"))?;

    let mut translated = String::new();
    for segment in segments {
        if let Some(part) = segment.get(0).and_then(|p| p.as_str()) {
            translated.push_str(part);
        }
    }
    Ok(translated)
}
