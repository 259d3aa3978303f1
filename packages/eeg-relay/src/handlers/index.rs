use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;
use tracing::warn;

use crate::state::RelayState;

/// Serve the page shell that polls `/data`
pub async fn index(State(state): State<Arc<RelayState>>) -> Response {
    let path = state.config.index_path();
    match tokio::fs::read_to_string(&path).await {
        Ok(page) => Html(page).into_response(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Index page unavailable");
            (
                StatusCode::NOT_FOUND,
                format!("Error: '{}' not found.", state.config.index_file),
            )
                .into_response()
        }
    }
}
