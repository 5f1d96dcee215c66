//! HTTP API over the signal service.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

use holdlab_runner::{ServiceError, SignalEnvelope, SignalService, SourceInfo};

type AppState = Arc<SignalService>;

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub success: bool,
    pub data: SignalEnvelope,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Service error rendered as `{"error": ...}` with its mapped status.
#[derive(Debug)]
pub struct ApiError(ServiceError);

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = serde_json::json!({ "error": self.0.public_message() });
        (status, Json(body)).into_response()
    }
}

pub fn router(service: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/sources", get(list_sources))
        .route("/api/signals/:source", get(get_signals))
        .route("/api/refresh/:source", post(refresh_signals))
        .with_state(service)
}

pub async fn serve(service: AppState, port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for ctrl-c");
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn list_sources(State(service): State<AppState>) -> Json<Vec<SourceInfo>> {
    Json(service.sources())
}

async fn get_signals(
    State(service): State<AppState>,
    Path(source): Path<String>,
) -> Result<Json<SignalEnvelope>, ApiError> {
    Ok(Json(fetch(service, source, false).await?))
}

async fn refresh_signals(
    State(service): State<AppState>,
    Path(source): Path<String>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let data = fetch(service, source, true).await?;
    Ok(Json(RefreshResponse {
        success: true,
        data,
    }))
}

/// Run the blocking pipeline off the async workers.
async fn fetch(
    service: AppState,
    source: String,
    force_refresh: bool,
) -> Result<SignalEnvelope, ApiError> {
    tokio::task::spawn_blocking(move || service.signals(&source, force_refresh))
        .await
        .map_err(|e| {
            error!(error = %e, "signal task panicked");
            ServiceError::Internal(e.to_string())
        })?
        .map_err(|e| {
            error!(code = e.code(), error = %e, "request failed");
            ApiError(e)
        })
}
