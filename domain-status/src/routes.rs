//! HTTP surface: router, handlers, CORS and error envelopes.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use domain_status_lib::{BatchRequest, DomainCheckError, DomainChecker};
use serde_json::{json, Value};
use std::sync::Arc;

/// Path of the batch check endpoint.
pub const CHECK_PATH: &str = "/check-domain";

const ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";
const ALLOW_METHODS: &str = "POST, OPTIONS";

/// Largest accepted request body. Ten domain names fit many times over.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Application state shared between handlers.
#[derive(Clone)]
pub struct AppState {
    checker: Arc<DomainChecker>,
}

impl AppState {
    pub fn new(checker: DomainChecker) -> Self {
        Self {
            checker: Arc::new(checker),
        }
    }
}

/// Build the service router.
pub fn build_router(checker: DomainChecker) -> Router {
    Router::new()
        .route(CHECK_PATH, post(check_domains).options(preflight))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(middleware::from_fn(cors))
        .with_state(AppState::new(checker))
}

/// Error envelope: `{"error": "..."}`.
///
/// Library errors map through `http_status()` (400 for malformed requests,
/// 500 otherwise); body rejections keep the status axum chose, such as 413.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<DomainCheckError> for ApiError {
    fn from(err: DomainCheckError) -> Self {
        Self {
            status: StatusCode::from_u16(err.http_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            message: err.to_string(),
        }
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, error = %self.message, "request failed");
        } else {
            tracing::debug!(status = %self.status, error = %self.message, "request rejected");
        }

        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Handler for `POST /check-domain`.
///
/// The body is read as raw bytes so that a missing or wrong content type
/// does not change how the JSON is judged.
async fn check_domains(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Value>, ApiError> {
    let body = body?;
    let value: Value = serde_json::from_slice(&body).map_err(DomainCheckError::from)?;
    let request = BatchRequest::from_json(&value)?;

    let results = state.checker.check_batch(&request).await;

    Ok(Json(json!({ "ok": true, "results": results })))
}

/// CORS preflight: empty 200, headers added by the middleware.
async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Handler for `GET /health`.
async fn health() -> Json<Value> {
    let info = domain_status_lib::info();
    Json(json!({
        "ok": true,
        "version": info.version,
        "features": info.features,
    }))
}

/// Adds the permissive CORS headers to every response.
pub async fn cors(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );

    response
}
