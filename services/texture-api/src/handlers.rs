//! HTTP request handlers.

use axum::{
    extract::{Extension, Path, Query},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, warn};

use forecast_common::{ArtifactKind, ForecastError, ForecastQuery};

use crate::state::AppState;

/// Router with every endpoint and the shared layers.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/data/:file", get(data_handler))
        .route("/serverInfo", get(server_info_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// ============================================================================
// Data
// ============================================================================

/// `GET /data/{product}.{png|json}`
pub async fn data_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(file): Path<String>,
    Query(query): Query<ForecastQuery>,
) -> Response {
    let (id, extension) = split_file_name(&file);

    let Some(fetcher) = state.registry.get(id).await else {
        debug!(product = id, "Unknown product");
        return error_response(&ForecastError::UnknownProduct(id.to_string()));
    };

    let Some(kind) = ArtifactKind::from_extension(extension) else {
        return error_response(&ForecastError::UnsupportedArtifact {
            product: id.to_string(),
            extension: extension.to_string(),
        });
    };

    match fetcher.fetch(&query, kind).await {
        Ok(artifact) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, artifact.mime_type)],
            artifact.data,
        )
            .into_response(),
        Err(e) => {
            warn!(file = %file, error = %e, "Fetch failed");
            error_response(&e)
        }
    }
}

/// Product id before the first `.`, extension after the last one.
fn split_file_name(file: &str) -> (&str, &str) {
    let id = file.split('.').next().unwrap_or_default();
    let extension = file.rsplit_once('.').map(|(_, ext)| ext).unwrap_or_default();
    (id, extension)
}

fn error_response(error: &ForecastError) -> Response {
    let status = StatusCode::from_u16(error.http_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, error.to_string()).into_response()
}

// ============================================================================
// Server info
// ============================================================================

pub async fn server_info_handler(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    let stats = state.registry.stats();

    Json(serde_json::json!({
        "inFlight": state.registry.in_flight().await,
        "cacheDir": state.registry.store().base_dir().display().to_string(),
        "builds": {
            "started": stats.started,
            "joined": stats.joined,
            "failed": stats.failed,
        },
        "metrics": state.metrics.snapshot(),
    }))
}

// ============================================================================
// Health
// ============================================================================

pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn metrics_handler(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    match &state.prometheus {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::OK, String::new()),
    }
}
