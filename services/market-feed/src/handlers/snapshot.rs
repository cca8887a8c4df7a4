//! Snapshot lookup by venue and symbol

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use types::book::Book;
use types::errors::FeedError;
use types::pair::Venue;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SnapshotParams {
    pub venue: Option<String>,
    pub symbol: Option<String>,
}

/// GET /api/snapshot?venue=binance&symbol=SOLUSDT
///
/// Returns the latest cached full-depth book, 400 on a missing parameter or
/// unrecognized venue, 404 when no data has arrived yet for the key.
pub async fn get_snapshot(
    State(state): State<AppState>,
    Query(params): Query<SnapshotParams>,
) -> Result<Json<Book>, AppError> {
    let venue_str = params
        .venue
        .ok_or(FeedError::MissingParam { param: "venue" })?;
    let symbol = params
        .symbol
        .ok_or(FeedError::MissingParam { param: "symbol" })?;

    let venue: Venue = venue_str.parse()?;

    let book = state
        .cache
        .get(venue, &symbol)
        .ok_or_else(|| FeedError::NoSnapshot {
            venue: venue.to_string(),
            symbol: symbol.clone(),
        })?;

    Ok(Json(book))
}
