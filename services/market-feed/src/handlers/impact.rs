//! Impact simulation over a cached book
//!
//! Thin wrapper over the pure `impact` library; the same computation is
//! available to any consumer holding a `Book` without going through this
//! endpoint.

use std::str::FromStr;

use axum::{
    extract::{Query, State},
    Json,
};
use impact::{simulate, AmountMode, ImpactResult, OrderSide};
use rust_decimal::Decimal;
use serde::Deserialize;
use types::errors::FeedError;
use types::pair::Venue;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ImpactParams {
    pub venue: Option<String>,
    pub symbol: Option<String>,
    pub side: Option<String>,
    pub mode: Option<String>,
    pub amount: Option<String>,
}

/// GET /api/impact?venue=binance&symbol=SOLUSDT&side=buy&mode=base&amount=10
pub async fn get_impact(
    State(state): State<AppState>,
    Query(params): Query<ImpactParams>,
) -> Result<Json<ImpactResult>, AppError> {
    let venue_str = params
        .venue
        .ok_or(FeedError::MissingParam { param: "venue" })?;
    let symbol = params
        .symbol
        .ok_or(FeedError::MissingParam { param: "symbol" })?;
    let side_str = params
        .side
        .ok_or(FeedError::MissingParam { param: "side" })?;
    let mode_str = params
        .mode
        .ok_or(FeedError::MissingParam { param: "mode" })?;
    let amount_str = params
        .amount
        .ok_or(FeedError::MissingParam { param: "amount" })?;

    let venue: Venue = venue_str.parse()?;

    let side = match side_str.as_str() {
        "buy" => OrderSide::Buy,
        "sell" => OrderSide::Sell,
        other => {
            return Err(AppError::BadRequest(format!(
                "Invalid side \"{other}\". Must be one of: buy, sell"
            )))
        }
    };

    let mode = match mode_str.as_str() {
        "base" => AmountMode::Base,
        "quote" => AmountMode::Quote,
        other => {
            return Err(AppError::BadRequest(format!(
                "Invalid mode \"{other}\". Must be one of: base, quote"
            )))
        }
    };

    let amount = Decimal::from_str(&amount_str)
        .map_err(|_| AppError::BadRequest(format!("Invalid amount \"{amount_str}\"")))?;

    let book = state
        .cache
        .get(venue, &symbol)
        .ok_or_else(|| FeedError::NoSnapshot {
            venue: venue.to_string(),
            symbol: symbol.clone(),
        })?;

    Ok(Json(simulate(&book, side, mode, amount)))
}
