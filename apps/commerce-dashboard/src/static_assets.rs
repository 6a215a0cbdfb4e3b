use axum::extract::Request;
use axum::handler::HandlerWithoutStateExt;
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::{HeaderValue, Uri};
use axum::middleware::{from_fn, Next};
use axum::response::{Html, IntoResponse, Response};
use axum::{routing::get, Router};
use std::path::Path;
use tower_http::services::ServeDir;

use crate::error::not_found;
use crate::state::AppState;

pub const SHELL_FILE: &str = "dashboard.html";

const DASHBOARD_HTML: &str = include_str!("../static/dashboard.html");
const DASHBOARD_SCRIPT: &str = include_str!("../static/dashboard_script.js");

async fn apply_cache_headers(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;

    if response.headers().contains_key(CACHE_CONTROL) || !response.status().is_success() {
        return response;
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    // The shell must always be refetched so chart wiring tracks the running server.
    let cache_value = if content_type.starts_with("text/html") {
        "no-store"
    } else {
        "public, max-age=86400"
    };

    if let Ok(value) = HeaderValue::from_str(cache_value) {
        response.headers_mut().insert(CACHE_CONTROL, value);
    }

    response
}

/// `/` serves the dashboard shell and `/static/*` its assets, either from
/// `static_root` on disk or from the copies compiled into the binary.
pub fn router(static_root: Option<&Path>) -> Router<AppState> {
    let router = if let Some(root) = static_root {
        let shell_path = root.join(SHELL_FILE);
        let shell_handler = move |uri: Uri| {
            let shell_path = shell_path.clone();
            async move {
                match tokio::fs::read_to_string(&shell_path).await {
                    Ok(html) => Html(html).into_response(),
                    Err(err) => {
                        tracing::warn!(
                            path = %shell_path.display(),
                            error = %err,
                            "dashboard shell unreadable"
                        );
                        not_found(uri).await.into_response()
                    }
                }
            }
        };
        let assets = ServeDir::new(root).not_found_service(not_found.into_service());
        Router::new()
            .route("/", get(shell_handler))
            .nest_service("/static", assets)
    } else {
        async fn shell_handler() -> Html<&'static str> {
            Html(DASHBOARD_HTML)
        }

        async fn script_handler() -> impl IntoResponse {
            (
                [(CONTENT_TYPE, "text/javascript; charset=utf-8")],
                DASHBOARD_SCRIPT,
            )
        }

        Router::new()
            .route("/", get(shell_handler))
            .route("/static/dashboard_script.js", get(script_handler))
    };
    router.layer(from_fn(apply_cache_headers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes;
    use crate::test_support::{test_config, test_state};
    use axum::body::Body;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    async fn fetch(app: Router, uri: &str) -> (StatusCode, Option<String>, String) {
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let cache = response
            .headers()
            .get(CACHE_CONTROL)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, cache, String::from_utf8_lossy(&bytes).into_owned())
    }

    fn app(static_root: Option<&Path>) -> Router {
        let mut config = test_config("unused.db".into());
        config.static_root = static_root.map(Path::to_path_buf);
        routes::router(test_state(config))
    }

    #[tokio::test]
    async fn embedded_shell_is_served_uncached() {
        let (status, cache, body) = fetch(app(None), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cache.as_deref(), Some("no-store"));
        assert!(body.contains("/static/dashboard_script.js"));

        let (status, cache, body) = fetch(app(None), "/static/dashboard_script.js").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cache.as_deref(), Some("public, max-age=86400"));
        assert!(body.contains("/api/orders_over_time"));
    }

    #[tokio::test]
    async fn disk_root_overrides_embedded_copies() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SHELL_FILE), "<html>custom shell</html>").unwrap();
        std::fs::write(dir.path().join("extra.css"), "body {}").unwrap();

        let (status, _, body) = fetch(app(Some(dir.path())), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("custom shell"));

        let (status, _, body) = fetch(app(Some(dir.path())), "/static/extra.css").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "body {}");
    }

    #[tokio::test]
    async fn missing_shell_on_disk_is_json_404() {
        let dir = tempfile::tempdir().unwrap();
        let (status, cache, body) = fetch(app(Some(dir.path())), "/").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(cache, None);
        assert_eq!(body, r#"{"error":"Not Found"}"#);
    }

    #[tokio::test]
    async fn missing_asset_is_json_404() {
        let dir = tempfile::tempdir().unwrap();
        let (status, _, body) = fetch(app(Some(dir.path())), "/static/nope.js").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, r#"{"error":"Not Found"}"#);

        let (status, _, body) = fetch(app(None), "/static/nope.js").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, r#"{"error":"Not Found"}"#);
    }
}
