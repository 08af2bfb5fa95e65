//! Recommendation and AI-draft handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppState;
use paperscope_common::db::{fresh_id, PaperListItem};
use paperscope_common::errors::{AppError, Result};

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub papers: Vec<PaperListItem>,
}

/// Recommend catalog papers related to the given paper.
///
/// The configuration guard runs before any database work: without a
/// project id the route answers 503 immediately. Recommended ids come
/// back grounded in the candidate catalog, so the final lookup returns
/// full rows in model order.
pub async fn recommendations(
    State(state): State<AppState>,
    Path(paper_id): Path<String>,
) -> Result<Json<RecommendationsResponse>> {
    let recommender = state
        .recommender
        .as_ref()
        .ok_or_else(|| AppError::Unavailable {
            message: "recommendation service is not configured".into(),
        })?;

    let subject = state.repo.paper_for_recommendation(&paper_id).await?;
    let candidates = state
        .repo
        .catalog_candidates(&paper_id, state.config.recommend.candidate_pool)
        .await?;

    if candidates.is_empty() {
        return Ok(Json(RecommendationsResponse { papers: vec![] }));
    }

    let ids = recommender
        .recommend(&subject, &candidates, state.config.recommend.count)
        .await?;
    let papers = state.repo.papers_by_ids_ordered(&ids).await?;

    tracing::info!(paper_id = %paper_id, returned = papers.len(), "Recommendations served");
    Ok(Json(RecommendationsResponse { papers }))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAiDraftRequest {
    #[validate(length(min = 1, message = "user_id is required"))]
    pub user_id: String,

    #[validate(length(min = 1, message = "source_paper_id is required"))]
    pub source_paper_id: String,

    #[validate(length(min = 1, max = 500))]
    pub paper_title: String,

    #[serde(rename = "abstract")]
    #[validate(length(min = 1))]
    pub abstract_text: String,
}

#[derive(Debug, Serialize)]
pub struct CreateAiDraftResponse {
    pub paper_id: String,
}

/// Persist a model-suggested draft as an AI_DRAFT paper linked to its
/// source paper and requesting user. The stored procedure owns the
/// atomicity of the paper, authorship and related-paper rows.
pub async fn create_ai_draft(
    State(state): State<AppState>,
    Json(request): Json<CreateAiDraftRequest>,
) -> Result<(StatusCode, Json<CreateAiDraftResponse>)> {
    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: None,
    })?;

    let paper_id = fresh_id("P");
    state
        .repo
        .create_ai_draft(
            &request.user_id,
            &request.source_paper_id,
            &paper_id,
            &request.paper_title,
            &request.abstract_text,
        )
        .await?;

    tracing::info!(
        paper_id = %paper_id,
        source = %request.source_paper_id,
        "AI draft created"
    );
    Ok((StatusCode::CREATED, Json(CreateAiDraftResponse { paper_id })))
}
