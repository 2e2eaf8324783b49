//! Vendor adapters over the real `reqwest` transport against a local mock server

use httpmock::prelude::*;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use tradz::providers::transport::OutboundCall;
use tradz::{
    HttpTransport, ProviderErrorKind, ProviderKind, ProviderSpec, ReqwestTransport, TranslationProvider,
    TranslationRequest, VendorAdapter,
};

fn adapter(kind: ProviderKind, endpoint: String, timeout_ms: u64) -> VendorAdapter {
    let spec = ProviderSpec::for_kind(kind, endpoint).with_timeout_ms(timeout_ms);
    VendorAdapter::new(spec, Arc::new(ReqwestTransport::new().unwrap()))
}

fn request() -> TranslationRequest {
    TranslationRequest::new("Olá mundo", "en").with_source_lang("pt")
}

#[tokio::test]
async fn test_google_success() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/translate_a/single")
            .query_param("client", "gtx")
            .query_param("sl", "pt")
            .query_param("tl", "en")
            .query_param("q", "Olá mundo");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!([[["Hello world", "Olá mundo", null, null, 10]], null, "pt"]));
    });

    let google = adapter(ProviderKind::Google, server.url("/translate_a/single"), 10_000);
    let result = google.translate(&request()).await;

    assert!(result.ok, "expected success, got {:?}", result);
    assert_eq!(result.translated_text, "Hello world");
    mock.assert();
}

#[tokio::test]
async fn test_mymemory_sentinel() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/get").query_param("langpair", "pt-BR|en");
        then.status(200).json_body(json!({
            "responseData": {"translatedText": "PLEASE SELECT TWO DISTINCT LANGUAGES"},
            "responseDetails": "PLEASE SELECT TWO DISTINCT LANGUAGES",
            "responseStatus": "403"
        }));
    });

    let mymemory = adapter(ProviderKind::MyMemory, server.url("/get"), 10_000);
    let result = mymemory.translate(&request()).await;

    assert!(!result.ok);
    assert_eq!(result.error_kind, Some(ProviderErrorKind::NoUsableTranslation));
    assert_eq!(result.status, None);
    mock.assert_hits(1);
}

#[tokio::test]
async fn test_libretranslate_posts_json() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/translate").json_body(json!({
            "q": "Olá mundo",
            "source": "pt",
            "target": "en",
            "format": "text"
        }));
        then.status(200).json_body(json!({"translatedText": "Hello world"}));
    });

    let libre = adapter(ProviderKind::LibreTranslate, server.url("/translate"), 10_000);
    let result = libre.translate(&request()).await;

    assert_eq!(result.translated_text, "Hello world");
    mock.assert();
}

#[tokio::test]
async fn test_server_error_is_vendor_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/get");
        then.status(500).body("Internal Server Error");
    });

    let mymemory = adapter(ProviderKind::MyMemory, server.url("/get"), 10_000);
    let result = mymemory.translate(&request()).await;

    assert_eq!(result.error_kind, Some(ProviderErrorKind::VendorError));
    assert_eq!(result.status, Some(500));
}

#[tokio::test]
async fn test_html_body_is_invalid_response() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/translate_a/single");
        then.status(200).body("<html><body>captcha</body></html>");
    });

    let google = adapter(ProviderKind::Google, server.url("/translate_a/single"), 10_000);
    let result = google.translate(&request()).await;

    assert_eq!(result.error_kind, Some(ProviderErrorKind::InvalidResponse));
}

#[tokio::test]
async fn test_slow_vendor_times_out_as_unreachable() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/get");
        then.status(200)
            .delay(Duration::from_millis(1_000))
            .json_body(json!({"responseData": {"translatedText": "Hello world"}, "responseStatus": 200}));
    });

    let mymemory = adapter(ProviderKind::MyMemory, server.url("/get"), 100);
    let result = mymemory.translate(&request()).await;

    assert_eq!(result.error_kind, Some(ProviderErrorKind::Unreachable));
    assert!(result.detail.unwrap().contains("timeout"));
}

#[tokio::test]
async fn test_connection_refused_is_unreachable() {
    // nothing listens on port 9 of localhost
    let google = adapter(ProviderKind::Google, "http://127.0.0.1:9/translate_a/single".to_string(), 2_000);
    let result = google.translate(&request()).await;

    assert_eq!(result.error_kind, Some(ProviderErrorKind::Unreachable));
}

#[tokio::test]
async fn test_truncated_error_body_stays_vendor_error() {
    // a 502 that promises more body than it sends, then hangs up
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/get", listener.local_addr().unwrap());
    tokio::spawn(async move {
        for _ in 0..2 {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let _ = socket
                .write_all(b"HTTP/1.1 502 Bad Gateway\r\nContent-Length: 100\r\nConnection: close\r\n\r\npartial")
                .await;
            let _ = socket.shutdown().await;
        }
    });

    let transport = ReqwestTransport::new().unwrap();
    let response = transport
        .send(OutboundCall::get(url.clone(), Duration::from_secs(5)))
        .await
        .expect("status line was received");
    assert_eq!(response.status, 502);
    assert!(response.body.is_empty());

    let mymemory = adapter(ProviderKind::MyMemory, url, 5_000);
    let result = mymemory.translate(&request()).await;
    assert_eq!(result.error_kind, Some(ProviderErrorKind::VendorError));
    assert_eq!(result.status, Some(502));
}
