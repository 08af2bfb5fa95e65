//! Venue handlers

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::handlers::DEFAULT_SINCE_YEAR;
use crate::AppState;
use paperscope_common::db::models::Venue;
use paperscope_common::db::VenueActivityRow;
use paperscope_common::errors::Result;

/// All venues, for create-form dropdowns
pub async fn list_venues(State(state): State<AppState>) -> Result<Json<Vec<Venue>>> {
    let venues = state.repo.venues_all().await?;
    Ok(Json(venues))
}

#[derive(Debug, Deserialize)]
pub struct RecentVenuesQuery {
    #[serde(rename = "sinceYear")]
    pub since_year: Option<i32>,
}

/// Venues with published-paper counts since a year (default 2018)
pub async fn recent_venues(
    State(state): State<AppState>,
    Query(query): Query<RecentVenuesQuery>,
) -> Result<Json<Vec<VenueActivityRow>>> {
    let since_year = query.since_year.unwrap_or(DEFAULT_SINCE_YEAR);

    let venues = state.repo.venue_activity(since_year).await?;
    Ok(Json(venues))
}
