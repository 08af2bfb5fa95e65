//! Analytical query handlers
//!
//! Four fixed reporting queries; each requires its parameters and maps
//! straight onto one repository method.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::handlers::date_window;
use crate::AppState;
use paperscope_common::db::{AdvancedUserPaperRow, ReviewerActivityRow, VenueBreakdownRow};
use paperscope_common::errors::{AppError, Result};

/// Default year floors for the user-paper and venue reports
const DEFAULT_USER_PAPERS_YEAR: i32 = 2024;
const DEFAULT_VENUES_YEAR: i32 = 2020;

fn require<T>(value: Option<T>, name: &str) -> Result<T> {
    value.ok_or_else(|| AppError::MissingParameter { name: name.into() })
}

#[derive(Debug, Deserialize)]
pub struct Query1Params {
    pub user_id: Option<String>,
    pub year: Option<i32>,
}

/// A user's project papers uploaded since a year, with review counts
pub async fn query1(
    State(state): State<AppState>,
    Query(params): Query<Query1Params>,
) -> Result<Json<Vec<AdvancedUserPaperRow>>> {
    let user_id = require(params.user_id, "user_id")?;
    let year = params.year.unwrap_or(DEFAULT_USER_PAPERS_YEAR);

    let rows = state.repo.advanced_user_papers_by_year(&user_id, year).await?;
    Ok(Json(rows))
}

#[derive(Debug, Deserialize)]
pub struct Query2Params {
    pub year: Option<i32>,
}

/// Published-paper counts per venue since a year
pub async fn query2(
    State(state): State<AppState>,
    Query(params): Query<Query2Params>,
) -> Result<Json<Vec<VenueBreakdownRow>>> {
    let year = params.year.unwrap_or(DEFAULT_VENUES_YEAR);

    let rows = state.repo.advanced_venues_by_year(year).await?;
    Ok(Json(rows))
}

#[derive(Debug, Deserialize)]
pub struct Query3Params {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Reviewers ranked by reviews received on their own papers
pub async fn query3(
    State(state): State<AppState>,
    Query(params): Query<Query3Params>,
) -> Result<Json<Vec<ReviewerActivityRow>>> {
    let (start_date, end_date) = date_window(params.start_date, params.end_date);

    let rows = state.repo.advanced_top_reviewers(&start_date, &end_date).await?;
    Ok(Json(rows))
}

#[derive(Debug, Deserialize)]
pub struct Query4Params {
    pub user_id: Option<String>,
}

/// A user's papers ranked by review activity
pub async fn query4(
    State(state): State<AppState>,
    Query(params): Query<Query4Params>,
) -> Result<Json<Vec<AdvancedUserPaperRow>>> {
    let user_id = require(params.user_id, "user_id")?;

    let rows = state.repo.advanced_user_paper_reviews(&user_id).await?;
    Ok(Json(rows))
}
