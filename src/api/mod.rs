use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::warn;

use crate::standings::error::ServiceError;
use crate::standings::QueryService;

/// Header carrying the shared secret when one is configured.
pub const SECRET_HEADER: &str = "x-api-secret";

#[derive(Clone)]
pub struct AppState {
    pub service: QueryService,
    /// `None` leaves the API open.
    pub api_secret: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct StandingsQuery {
    #[serde(default)]
    refresh: bool,
}

/// Build the Axum router for the standings API.
pub fn router(state: AppState) -> Router {
    let state = Arc::new(state);

    let api = Router::new()
        .route("/api/standings", get(standings_handler))
        .route("/api/standings/status", get(status_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_secret));

    Router::new()
        .route("/health", get(health_handler))
        .merge(api)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn require_secret(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    if let Some(secret) = state.api_secret.as_deref() {
        let provided = req.headers().get(SECRET_HEADER).and_then(|v| v.to_str().ok());
        if provided != Some(secret) {
            warn!(path = %req.uri().path(), "Rejected request with missing or bad API secret");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "unauthorized" })),
            )
                .into_response();
        }
    }
    next.run(req).await
}

/// GET /health
async fn health_handler() -> &'static str {
    "ok"
}

/// GET /api/standings?refresh=true
async fn standings_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StandingsQuery>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    state
        .service
        .get_standings(query.refresh)
        .await
        .map(Json)
        .map_err(|e| match e {
            ServiceError::NoDataAvailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "error": e.to_string() })),
            ),
        })
}

/// GET /api/standings/status
async fn status_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.service.status().await)
}
