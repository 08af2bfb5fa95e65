//! Review handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppState;
use paperscope_common::db::{AssignedReviewRow, ReviewRow, ReviewableRow};
use paperscope_common::errors::{AppError, Result};

/// Reviews for a paper, newest first
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(paper_id): Path<String>,
) -> Result<Json<Vec<ReviewRow>>> {
    let reviews = state.repo.reviews_for_paper(&paper_id).await?;
    Ok(Json(reviews))
}

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitReviewRequest {
    #[validate(length(min = 1, message = "user_id is required"))]
    pub user_id: String,

    #[validate(length(min = 1, max = 10000, message = "comment is required"))]
    pub comment: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitReviewResponse {
    pub review_id: String,
}

/// Submit a review. Authors cannot review their own papers.
pub async fn submit_review(
    State(state): State<AppState>,
    Path(paper_id): Path<String>,
    Json(request): Json<SubmitReviewRequest>,
) -> Result<(StatusCode, Json<SubmitReviewResponse>)> {
    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: None,
    })?;

    let review_id = state
        .repo
        .submit_review(&paper_id, &request.user_id, &request.comment)
        .await?;

    tracing::info!(paper_id = %paper_id, review_id = %review_id, "Review submitted");
    Ok((StatusCode::CREATED, Json(SubmitReviewResponse { review_id })))
}

/// Papers authored by the user that are currently under review
pub async fn papers_in_review(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<AssignedReviewRow>>> {
    let papers = state.repo.papers_in_review(&user_id).await?;
    Ok(Json(papers))
}

/// Review queue row with the flag decoded from its SQL 0/1 form
#[derive(Debug, Serialize)]
pub struct ReviewQueueItem {
    pub paper_id: String,
    pub paper_title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub pdf_url: Option<String>,
    pub upload_timestamp: Option<chrono::NaiveDateTime>,
    pub status: String,
    pub venue_name: Option<String>,
    pub year: Option<i32>,
    pub review_count: i64,
    pub last_review_at: Option<chrono::NaiveDateTime>,
    pub has_reviewed: bool,
}

impl From<ReviewableRow> for ReviewQueueItem {
    fn from(row: ReviewableRow) -> Self {
        Self {
            paper_id: row.paper_id,
            paper_title: row.paper_title,
            abstract_text: row.abstract_text,
            pdf_url: row.pdf_url,
            upload_timestamp: row.upload_timestamp,
            status: row.status,
            venue_name: row.venue_name,
            year: row.year,
            review_count: row.review_count,
            last_review_at: row.last_review_at,
            has_reviewed: row.has_reviewed != 0,
        }
    }
}

/// Review queue for a reviewer. Unknown users yield 404; known
/// non-reviewers get an empty queue.
pub async fn assigned_reviews(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<ReviewQueueItem>>> {
    let rows = state.repo.assigned_reviews(&user_id).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}
