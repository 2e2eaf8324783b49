//! HTTP API server implementation

use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::core::config::GatewayConfig;
use crate::core::detector;
use crate::core::gateway::TranslationGateway;
use crate::core::models::{
    GatewayOutcome, TranslationRequest, AUTO_LANG, DEFAULT_TARGET_LANG, SUPPORTED_LANGUAGES,
};

const INCOMPLETE_DATA: &str = "Dados incompletos. 'texto' é obrigatório.";
const SERVER_ERROR: &str = "Ocorreu um erro no servidor";
const INVALID_REQUEST: &str = "Idioma ou requisição inválidos";

/// Application state
#[derive(Clone)]
pub struct AppState {
    gateway: TranslationGateway,
}

impl AppState {
    /// State around a ready gateway
    pub fn new(gateway: TranslationGateway) -> Self {
        Self { gateway }
    }
}

/// Body of `POST /traduzir`
#[derive(Deserialize)]
pub struct TraduzirRequest {
    /// Text to translate; the only required field
    pub texto: Option<String>,
    /// Source language, `"auto"` when absent
    pub origem: Option<String>,
    /// Target language, `"en"` when absent
    pub destino: Option<String>,
}

/// Successful `POST /traduzir` body
#[derive(Serialize)]
pub struct TraduzirResponse {
    /// Sanitized translation, `""` for blank input
    pub texto_traduzido: String,
}

/// Body of `POST /detectar`
#[derive(Deserialize)]
pub struct DetectarRequest {
    /// Text to classify
    pub texto: Option<String>,
}

/// Detection result with the per-language scores
#[derive(Serialize)]
pub struct DetectarResponse {
    /// Winning language code
    pub idioma: String,
    /// Stopword hits per language, in tie-break order
    pub pontuacao: Vec<LanguageScore>,
}

/// Stopword hits for one language
#[derive(Serialize)]
pub struct LanguageScore {
    /// Language code
    pub idioma: String,
    /// Number of stopwords found
    pub acertos: usize,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    service: String,
    version: String,
    provedores: Vec<String>,
    timestamp: String,
}

#[derive(Serialize)]
struct IdiomasResponse {
    idiomas: Vec<IdiomaInfo>,
}

#[derive(Serialize)]
struct IdiomaInfo {
    codigo: String,
    nome: String,
    detectavel: bool,
}

/// Error response
#[derive(Serialize)]
pub struct ErrorResponse {
    /// Message shown to the user
    pub erro: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            erro: message.into(),
        }),
    )
        .into_response()
}

/// Non-blank value or the default
fn or_default(value: Option<String>, default: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Health check handler
async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        provedores: state.gateway.provider_names(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Supported languages handler
async fn list_languages() -> Json<IdiomasResponse> {
    let detectable: Vec<&str> = detector::detectable_languages().collect();
    Json(IdiomasResponse {
        idiomas: SUPPORTED_LANGUAGES
            .iter()
            .map(|(code, name)| IdiomaInfo {
                codigo: code.to_string(),
                nome: name.to_string(),
                detectavel: detectable.contains(code),
            })
            .collect(),
    })
}

/// Language detection handler
async fn detect_language(payload: Result<Json<DetectarRequest>, JsonRejection>) -> Response {
    let texto = match payload {
        Ok(Json(DetectarRequest { texto: Some(texto) })) => texto,
        Ok(_) => return error_response(StatusCode::BAD_REQUEST, INCOMPLETE_DATA),
        Err(rejection) => {
            debug!("Rejected detection body: {}", rejection);
            return error_response(StatusCode::BAD_REQUEST, INCOMPLETE_DATA);
        }
    };

    let pontuacao = detector::score(&texto)
        .into_iter()
        .map(|(idioma, acertos)| LanguageScore {
            idioma: idioma.to_string(),
            acertos,
        })
        .collect();

    Json(DetectarResponse {
        idioma: detector::detect(&texto).to_string(),
        pontuacao,
    })
    .into_response()
}

/// Translation handler
async fn translate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TraduzirRequest>, JsonRejection>,
) -> Response {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            debug!("Rejected translation body: {}", rejection);
            return error_response(StatusCode::BAD_REQUEST, INCOMPLETE_DATA);
        }
    };

    let Some(texto) = payload.texto else {
        return error_response(StatusCode::BAD_REQUEST, INCOMPLETE_DATA);
    };

    let request = TranslationRequest::new(texto, or_default(payload.destino, DEFAULT_TARGET_LANG))
        .with_source_lang(or_default(payload.origem, AUTO_LANG));

    let outcome = state.gateway.translate_text(&request).await;

    for attempt in outcome.attempts() {
        match attempt.error_kind {
            Some(kind) => warn!(
                provider = %attempt.provider,
                error_kind = %kind,
                status = ?attempt.status,
                elapsed_ms = attempt.elapsed_ms,
                "Provider attempt failed: {}",
                attempt.detail.as_deref().unwrap_or("")
            ),
            None => debug!(
                provider = %attempt.provider,
                elapsed_ms = attempt.elapsed_ms,
                "Provider attempt succeeded"
            ),
        }
    }

    let client_fault = outcome.is_client_fault();
    match outcome {
        GatewayOutcome::EmptyInput => Json(TraduzirResponse {
            texto_traduzido: String::new(),
        })
        .into_response(),
        GatewayOutcome::Translated {
            text,
            source_lang,
            provider,
            attempts,
        } => {
            if attempts.len() > 1 {
                info!(
                    "Translated {} -> {} via fallback provider {}",
                    source_lang, request.target_lang, provider
                );
            }
            Json(TraduzirResponse {
                texto_traduzido: text,
            })
            .into_response()
        }
        GatewayOutcome::Failed { detail, .. } => {
            error!("Erro na tradução: {}", detail);
            if client_fault {
                error_response(
                    StatusCode::BAD_REQUEST,
                    format!("{}: {}", INVALID_REQUEST, detail),
                )
            } else {
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("{}: nenhum provedor conseguiu traduzir ({})", SERVER_ERROR, detail),
                )
            }
        }
    }
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "erro desconhecido".to_string()
    };
    error!("Unhandled fault while serving request: {}", detail);
    error_response(StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR)
}

/// CORS layer allowing only the configured frontend origin
pub fn cors_layer(frontend_url: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    match HeaderValue::from_str(frontend_url.trim_end_matches('/')) {
        Ok(origin) => layer.allow_origin(AllowOrigin::list([origin])),
        Err(e) => {
            warn!("Ignoring invalid FRONTEND_URL {:?}: {}", frontend_url, e);
            layer
        }
    }
}

/// Build the router with all routes and layers
pub fn router(gateway: TranslationGateway, frontend_url: &str) -> Router {
    let state = Arc::new(AppState::new(gateway));

    Router::new()
        .route("/", get(health_check))
        .route("/idiomas", get(list_languages))
        .route("/detectar", post(detect_language))
        .route("/traduzir", post(translate))
        .with_state(state)
        .layer(cors_layer(frontend_url))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
}

/// Run the HTTP server
pub async fn run_server(config: GatewayConfig) -> anyhow::Result<()> {
    let gateway = TranslationGateway::from_config(&config)?;
    let app = router(gateway, &config.frontend_url);

    let listener = bind(&config.host, config.port).await?;

    info!("Starting server on {}", listener.local_addr()?);
    info!("CORS origin: {}", config.frontend_url);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Bind `host:port`; `host` may be a name such as `localhost` or a bare IPv6 address
pub async fn bind(host: &str, port: u16) -> anyhow::Result<tokio::net::TcpListener> {
    tokio::net::TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", host, port))
}
