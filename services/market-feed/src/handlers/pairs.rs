//! Supported pair and venue listings

use axum::{extract::State, Json};
use types::pair::{PairConfig, Venue};

use crate::state::AppState;

/// GET /api/pairs — the full supported pair configuration.
pub async fn list_pairs(State(state): State<AppState>) -> Json<Vec<PairConfig>> {
    Json(state.pairs.as_ref().clone())
}

/// GET /api/venues — distinct venues across the supported pairs.
pub async fn list_venues(State(state): State<AppState>) -> Json<Vec<Venue>> {
    let mut venues: Vec<Venue> = Vec::new();
    for pair in state.pairs.iter() {
        if !venues.contains(&pair.venue) {
            venues.push(pair.venue);
        }
    }
    Json(venues)
}
