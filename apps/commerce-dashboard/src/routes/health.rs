use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

#[derive(Debug, Clone, serde::Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    /// `ok` when the report store is on disk, `degraded` otherwise.
    pub status: String,
    pub database: String,
    pub database_present: bool,
}

/// Liveness plus a stat of the report store. Never opens a connection.
#[utoipa::path(
    get,
    path = "/healthz",
    responses((status = 200, description = "Server is up", body = HealthResponse))
)]
pub(crate) async fn healthz_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let path = state.db.path();
    let database_present = tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false);
    let status = if database_present { "ok" } else { "degraded" };
    Json(HealthResponse {
        status: status.to_string(),
        database: path.display().to_string(),
        database_present,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/healthz", get(healthz_handler))
}
