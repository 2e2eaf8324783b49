//! Outbound HTTP transport used by the provider adapters

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::core::errors::{Result, TransportError};

/// HTTP verb of an outbound call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Query-string request
    Get,
    /// JSON body request
    Post,
}

/// A single outbound call described independently of any HTTP client
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundCall {
    /// HTTP verb
    pub method: Method,
    /// Endpoint without query string
    pub url: String,
    /// Query parameters, in insertion order
    pub query: Vec<(String, String)>,
    /// JSON body for POST calls
    pub json: Option<serde_json::Value>,
    /// Upper bound for the whole call, body included
    pub timeout: Duration,
}

impl OutboundCall {
    /// GET call without parameters
    pub fn get(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            query: Vec::new(),
            json: None,
            timeout,
        }
    }

    /// POST call carrying `body` as JSON
    pub fn post_json(url: impl Into<String>, body: serde_json::Value, timeout: Duration) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            query: Vec::new(),
            json: Some(body),
            timeout,
        }
    }

    /// Append a query parameter
    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    /// Query value by key, first match
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Status and body of a completed call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw body, empty when a rejected response could not be read
    pub body: String,
}

impl TransportResponse {
    /// 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends outbound calls; implementations map every failure to `TransportError`
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Perform `call` within its timeout
    async fn send(&self, call: OutboundCall) -> std::result::Result<TransportResponse, TransportError>;
}

/// `reqwest` backed transport sharing one connection pool
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Transport with a pooled client
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .pool_idle_timeout(Some(Duration::from_secs(30)))
            .pool_max_idle_per_host(10)
            .user_agent(concat!("tradz/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

fn classify(e: reqwest::Error, timeout_ms: u64) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout { timeout_ms }
    } else {
        TransportError::Network {
            message: e.to_string(),
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, call: OutboundCall) -> std::result::Result<TransportResponse, TransportError> {
        let timeout_ms = call.timeout.as_millis() as u64;
        debug!("{:?} {} ({} ms timeout)", call.method, call.url, timeout_ms);

        let mut builder = match call.method {
            Method::Get => self.client.get(&call.url),
            Method::Post => self.client.post(&call.url),
        };
        if !call.query.is_empty() {
            builder = builder.query(&call.query);
        }
        if let Some(body) = &call.json {
            builder = builder.json(body);
        }

        let response = builder
            .timeout(call.timeout)
            .send()
            .await
            .map_err(|e| classify(e, timeout_ms))?;
        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            // status alone classifies a rejected call
            Err(e) if !status.is_success() => {
                debug!("Discarding unreadable {} body: {}", status, e);
                String::new()
            }
            Err(e) => return Err(classify(e, timeout_ms)),
        };

        Ok(TransportResponse {
            status: status.as_u16(),
            body,
        })
    }
}
