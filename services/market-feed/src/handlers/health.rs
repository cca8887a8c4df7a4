//! Health probe

use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub uptime_secs: u64,
    pub subscribers: usize,
    pub cached_books: usize,
}

/// GET /api/health
pub async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        uptime_secs: state.uptime_secs(),
        subscribers: state.hub.subscriber_count(),
        cached_books: state.cache.len(),
    })
}
