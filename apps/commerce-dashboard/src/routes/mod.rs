pub mod health;
pub mod reports;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let shell = crate::static_assets::router(state.config.static_root.as_deref());
    Router::new()
        .merge(health::router())
        .merge(shell)
        .nest(
            "/api",
            Router::new()
                .merge(reports::router())
                .merge(crate::openapi::router()),
        )
        .fallback(crate::error::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{test_config, test_state, TestDatabase};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn healthz(app: Router) -> serde_json::Value {
        let response = app
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn healthz_reports_missing_database_without_failing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.db");
        let body = healthz(router(test_state(test_config(path.clone())))).await;
        assert_eq!(
            body,
            serde_json::json!({
                "status": "degraded",
                "database": path.display().to_string(),
                "database_present": false,
            })
        );
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn healthz_reports_present_database() -> anyhow::Result<()> {
        let fixture = TestDatabase::new().await?;
        let body = healthz(router(test_state(test_config(fixture.path().to_path_buf())))).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["database_present"], true);
        Ok(())
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(test_state(test_config(dir.path().join("missing.db"))));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(doc["paths"]["/api/temperature_over_time"]["get"].is_object());
    }
}
