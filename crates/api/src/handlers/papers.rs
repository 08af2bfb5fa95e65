//! Paper catalog handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::handlers::MessageResponse;
use crate::AppState;
use paperscope_common::db::{
    validate_limit, validate_page, NewPaperInput, UpdatePaperInput,
};
use paperscope_common::db::models::PaperStatus;
use paperscope_common::errors::{AppError, Result};

#[derive(Debug, Deserialize)]
pub struct ListPapersQuery {
    /// Legacy free-text parameter (top-20 array response)
    pub search: Option<String>,

    /// Envelope parameters
    pub q: Option<String>,
    pub venue_id: Option<String>,
    pub status: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl ListPapersQuery {
    /// Any envelope parameter switches the response to the paginated shape
    fn wants_envelope(&self) -> bool {
        self.q.is_some()
            || self.venue_id.is_some()
            || self.status.is_some()
            || self.page.is_some()
            || self.limit.is_some()
    }
}

/// List papers. Without envelope parameters this is the legacy shape:
/// a bare array of the 20 most recent papers, optionally filtered by
/// `search`. With any of q/venue_id/status/page/limit it returns
/// `{ papers, pagination }`.
pub async fn list_papers(
    State(state): State<AppState>,
    Query(query): Query<ListPapersQuery>,
) -> Result<Response> {
    if query.wants_envelope() {
        let page = validate_page(query.page)?;
        let limit = validate_limit(query.limit)?;
        let result = state
            .repo
            .list_papers_page(
                query.q.as_deref(),
                query.venue_id.as_deref(),
                query.status.as_deref(),
                page,
                limit,
            )
            .await?;
        Ok(Json(result).into_response())
    } else {
        let papers = state.repo.list_papers_latest(query.search.as_deref()).await?;
        Ok(Json(papers).into_response())
    }
}

/// Get a paper with its venue and review stats
pub async fn get_paper(
    State(state): State<AppState>,
    Path(paper_id): Path<String>,
) -> Result<Response> {
    let detail = state.repo.paper_detail(&paper_id).await?;
    Ok(Json(detail).into_response())
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePaperRequest {
    #[validate(length(min = 1, max = 500))]
    pub paper_title: String,

    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,

    pub pdf_url: Option<String>,

    pub status: PaperStatus,

    pub venue_id: Option<String>,
}

/// Update a paper's mutable fields. Database triggers gate status
/// transitions (an AI draft cannot be promoted untouched); their
/// rejections come back as 400s.
pub async fn update_paper(
    State(state): State<AppState>,
    Path(paper_id): Path<String>,
    Json(request): Json<UpdatePaperRequest>,
) -> Result<Json<MessageResponse>> {
    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: None,
    })?;

    state
        .repo
        .update_paper(
            &paper_id,
            UpdatePaperInput {
                paper_title: request.paper_title,
                abstract_text: request.abstract_text,
                pdf_url: request.pdf_url,
                status: request.status,
                venue_id: request.venue_id,
            },
        )
        .await?;

    tracing::info!(paper_id = %paper_id, "Paper updated");
    Ok(Json(MessageResponse::new("Paper updated")))
}

#[derive(Debug, Deserialize)]
pub struct DeletePaperQuery {
    pub user_id: Option<String>,
}

/// Delete a paper. Only an author may delete; the stored procedure
/// cascades reviews, related-paper links and authorship rows.
pub async fn delete_paper(
    State(state): State<AppState>,
    Path(paper_id): Path<String>,
    Query(query): Query<DeletePaperQuery>,
) -> Result<StatusCode> {
    let user_id = query.user_id.ok_or(AppError::MissingParameter {
        name: "user_id".into(),
    })?;

    state.repo.delete_paper(&paper_id, &user_id).await?;

    tracing::info!(paper_id = %paper_id, user_id = %user_id, "Paper deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreatePaperRequest {
    #[validate(length(min = 1, max = 500))]
    pub paper_title: String,

    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,

    #[validate(length(min = 1))]
    pub pdf_url: String,

    pub status: PaperStatus,

    #[validate(length(min = 1))]
    pub venue_id: String,

    pub project_id: Option<String>,

    pub dataset_id: Option<String>,

    #[validate(length(min = 1, message = "at least one author is required"))]
    pub author_ids: Vec<String>,
}

impl From<CreatePaperRequest> for NewPaperInput {
    fn from(request: CreatePaperRequest) -> Self {
        NewPaperInput {
            paper_title: request.paper_title,
            abstract_text: request.abstract_text,
            pdf_url: request.pdf_url,
            status: request.status,
            venue_id: request.venue_id,
            project_id: request.project_id,
            dataset_id: request.dataset_id,
            author_ids: request.author_ids,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatePaperResponse {
    pub paper_id: String,
}

/// Create one paper with its authors in a single transaction
pub async fn create_paper_with_authors(
    State(state): State<AppState>,
    Json(request): Json<CreatePaperRequest>,
) -> Result<(StatusCode, Json<CreatePaperResponse>)> {
    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: None,
    })?;

    let paper_id = state
        .repo
        .create_paper_with_authors(request.into())
        .await?;

    tracing::info!(paper_id = %paper_id, "Paper created");
    Ok((StatusCode::CREATED, Json(CreatePaperResponse { paper_id })))
}

#[derive(Debug, Deserialize, Validate)]
pub struct BatchCreateRequest {
    #[validate(
        length(min = 1, max = 50, message = "between 1 and 50 papers per batch"),
        nested
    )]
    pub papers: Vec<CreatePaperRequest>,
}

/// Create a batch of papers atomically: every paper and authorship row in
/// the batch is committed, or none is. Unknown referenced ids yield 400;
/// an existing (venue, title) pair yields 409 naming the titles.
pub async fn batch_create_papers(
    State(state): State<AppState>,
    Json(request): Json<BatchCreateRequest>,
) -> Result<Response> {
    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: None,
    })?;

    let inputs: Vec<NewPaperInput> = request.papers.into_iter().map(Into::into).collect();
    match state.repo.batch_create_papers(inputs).await {
        Ok(summary) => {
            tracing::info!(created = summary.created_count, "Paper batch created");
            Ok((StatusCode::CREATED, Json(summary)).into_response())
        }
        // the 409 body names the conflicting titles as structured details
        Err(AppError::Duplicate { message, duplicates }) => {
            let details = serde_json::json!({ "duplicates": &duplicates });
            Ok(AppError::Duplicate { message, duplicates }
                .into_response_with_details(details))
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_paper() -> CreatePaperRequest {
        CreatePaperRequest {
            paper_title: "Attention Is All You Need".into(),
            abstract_text: None,
            pdf_url: "https://example.org/attention.pdf".into(),
            status: PaperStatus::UnderReview,
            venue_id: "V001".into(),
            project_id: None,
            dataset_id: None,
            author_ids: vec!["U001".into()],
        }
    }

    #[test]
    fn test_paper_without_authors_rejected() {
        let mut request = valid_paper();
        request.author_ids.clear();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_empty_batch_rejected() {
        let request = BatchCreateRequest { papers: vec![] };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_batch_validates_members() {
        let mut bad = valid_paper();
        bad.paper_title = "".into();
        let request = BatchCreateRequest {
            papers: vec![valid_paper(), bad],
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_envelope_detection() {
        let legacy = ListPapersQuery {
            search: Some("transformers".into()),
            q: None,
            venue_id: None,
            status: None,
            page: None,
            limit: None,
        };
        assert!(!legacy.wants_envelope());

        let paginated = ListPapersQuery {
            search: None,
            q: None,
            venue_id: None,
            status: None,
            page: Some(2),
            limit: None,
        };
        assert!(paginated.wants_envelope());
    }

    #[test]
    fn test_status_literals_deserialize() {
        let status: PaperStatus = serde_json::from_str("\"Under Review\"").unwrap();
        assert_eq!(status, PaperStatus::UnderReview);
        let status: PaperStatus = serde_json::from_str("\"AI_DRAFT\"").unwrap();
        assert_eq!(status, PaperStatus::AiDraft);
    }
}
