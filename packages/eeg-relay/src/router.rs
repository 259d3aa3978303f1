use axum::{http::Method, routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{get_data, health_check, index};
use crate::state::RelayState;

pub fn create_router(state: Arc<RelayState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/data", get(get_data))
        .route("/health", get(health_check))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET])
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RelayConfig;
    use crate::handlers::HealthResponse;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn get_text(router: Router, uri: &str) -> (StatusCode, String, String) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .expect("Failed to send request");

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, content_type, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_data_before_first_frame() {
        let state = Arc::new(RelayState::new(RelayConfig::default()));

        let (status, content_type, body) = get_text(create_router(state), "/data").await;

        assert_eq!(status, StatusCode::OK);
        assert!(content_type.starts_with("text/plain"));
        assert_eq!(body, "No data received yet.");
    }

    #[tokio::test]
    async fn test_data_returns_latest_line_verbatim() {
        let state = Arc::new(RelayState::new(RelayConfig::default()));
        state.store.write("0.1000,-0.2000\n");
        state.store.write("1.2500,-3.0000\n");

        let (status, _, body) = get_text(create_router(state), "/data").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "1.2500,-3.0000\n");
    }

    #[tokio::test]
    async fn test_index_serves_page() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("page.html"), "<html>plot</html>").unwrap();
        let config = RelayConfig {
            static_dir: dir.path().to_path_buf(),
            index_file: "page.html".to_string(),
            ..RelayConfig::default()
        };
        let state = Arc::new(RelayState::new(config));

        let (status, content_type, body) = get_text(create_router(state), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(content_type.starts_with("text/html"));
        assert_eq!(body, "<html>plot</html>");
    }

    #[tokio::test]
    async fn test_index_missing_page() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = RelayConfig {
            static_dir: dir.path().to_path_buf(),
            ..RelayConfig::default()
        };
        let state = Arc::new(RelayState::new(config));

        let (status, _, body) = get_text(create_router(state), "/").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Error: 'webgl_graph.html' not found.");
    }

    #[tokio::test]
    async fn test_health_reports_store_stats() {
        let state = Arc::new(RelayState::new(RelayConfig::default()));
        state.store.write("1.0000\n");
        let _producer = state.producer.try_acquire();

        let (status, _, body) = get_text(create_router(state), "/health").await;
        let health: HealthResponse = serde_json::from_str(&body).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert_eq!(health.status, "healthy");
        assert_eq!(health.frames_received, 1);
        assert!(health.producer_connected);
        assert!(health.last_frame_at.is_some());
        assert_eq!(health.channels, 8);
        assert_eq!(health.samples_per_channel, 1000);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let state = Arc::new(RelayState::new(RelayConfig::default()));
        let (status, _, _) = get_text(create_router(state), "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
