//! Reviewer ranking and review-queue handlers

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::handlers::reviews::ReviewQueueItem;
use crate::handlers::date_window;
use crate::AppState;
use paperscope_common::db::{validate_limit, validate_page, Pagination, ReviewerRow};
use paperscope_common::errors::{AppError, Result};

#[derive(Debug, Deserialize)]
pub struct TopReviewersQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Reviewers ranked by review count over a date window; each side of
/// the window falls back to the default range independently.
pub async fn top_reviewers(
    State(state): State<AppState>,
    Query(query): Query<TopReviewersQuery>,
) -> Result<Json<Vec<ReviewerRow>>> {
    let (from, to) = date_window(query.from, query.to);

    let reviewers = state.repo.top_reviewers(&from, &to).await?;
    Ok(Json(reviewers))
}

#[derive(Debug, Deserialize)]
pub struct ReviewablePapersQuery {
    pub user_id: Option<String>,
    pub venue_id: Option<String>,
    pub q: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct ReviewablePapersResponse {
    pub papers: Vec<ReviewQueueItem>,
    pub pagination: Pagination,
}

/// Paginated list of papers the given user may review
pub async fn reviewable_papers(
    State(state): State<AppState>,
    Query(query): Query<ReviewablePapersQuery>,
) -> Result<Json<ReviewablePapersResponse>> {
    let user_id = query.user_id.ok_or(AppError::MissingParameter {
        name: "user_id".into(),
    })?;
    let page = validate_page(query.page)?;
    let limit = validate_limit(query.limit)?;

    let (rows, pagination) = state
        .repo
        .reviewable_papers(
            &user_id,
            query.venue_id.as_deref(),
            query.q.as_deref(),
            page,
            limit,
        )
        .await?;

    Ok(Json(ReviewablePapersResponse {
        papers: rows.into_iter().map(Into::into).collect(),
        pagination,
    }))
}
