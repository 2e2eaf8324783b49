//! Shared mock providers and transports for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tradz::core::errors::{ProviderErrorKind, ProviderFailure, TransportError};
use tradz::providers::transport::{HttpTransport, OutboundCall, TransportResponse};
use tradz::{ProviderResult, TranslationProvider, TranslationRequest};

/// Behavior of a [`MockProvider`]
#[derive(Debug, Clone)]
pub enum MockBehavior {
    Translate(String),
    Fail(ProviderErrorKind, Option<u16>),
}

/// Provider returning a fixed answer and counting calls
#[derive(Debug)]
pub struct MockProvider {
    name: String,
    behavior: MockBehavior,
    calls: AtomicUsize,
}

impl MockProvider {
    pub fn translating(name: &str, text: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            behavior: MockBehavior::Translate(text.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(name: &str, kind: ProviderErrorKind) -> Arc<Self> {
        Self::failing_with_status(name, kind, None)
    }

    pub fn failing_with_status(name: &str, kind: ProviderErrorKind, status: Option<u16>) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            behavior: MockBehavior::Fail(kind, status),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranslationProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn translate(&self, _request: &TranslationRequest) -> ProviderResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            MockBehavior::Translate(text) => ProviderResult::success(&self.name, text.clone(), None),
            MockBehavior::Fail(kind, status) => {
                let mut failure = ProviderFailure::new(*kind, "mock failure");
                failure.status = *status;
                ProviderResult::failure(&self.name, failure, None)
            }
        }
    }
}

/// Transport replaying queued answers in order
#[derive(Default)]
pub struct ScriptedTransport {
    answers: Mutex<VecDeque<Result<TransportResponse, TransportError>>>,
    pub calls: Mutex<Vec<OutboundCall>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_json(&self, status: u16, body: serde_json::Value) {
        self.answers.lock().unwrap().push_back(Ok(TransportResponse {
            status,
            body: body.to_string(),
        }));
    }

    pub fn push_error(&self, error: TransportError) {
        self.answers.lock().unwrap().push_back(Err(error));
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, call: OutboundCall) -> Result<TransportResponse, TransportError> {
        self.calls.lock().unwrap().push(call);
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(TransportError::Network {
                    message: "no scripted answer left".to_string(),
                })
            })
    }
}
