use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::state::RelayState;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub frames_received: u64,
    pub producer_connected: bool,
    pub last_frame_at: Option<DateTime<Utc>>,
    pub uptime_seconds: u64,
    pub channels: usize,
    pub samples_per_channel: usize,
}

/// Health check endpoint
pub async fn health_check(
    State(state): State<Arc<RelayState>>,
) -> (StatusCode, Json<HealthResponse>) {
    let stats = state.store.stats();
    let response = HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        frames_received: stats.frames_received,
        producer_connected: state.producer.is_active(),
        last_frame_at: stats.last_frame_at,
        uptime_seconds: state.uptime_seconds(),
        channels: state.config.layout.channels(),
        samples_per_channel: state.config.layout.samples_per_channel(),
    };

    (StatusCode::OK, Json(response))
}
