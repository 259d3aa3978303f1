use axum::{extract::State, http::header, response::IntoResponse};
use std::sync::Arc;

use crate::state::RelayState;

/// Latest frame line as plain text, or the placeholder before the first frame
pub async fn get_data(State(state): State<Arc<RelayState>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        state.store.read().into_body(),
    )
}
