//! Author portfolio and insights handlers

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::handlers::DEFAULT_PORTFOLIO_SINCE;
use crate::AppState;
use paperscope_common::db::AuthorInsights;
use paperscope_common::errors::Result;

#[derive(Debug, Deserialize)]
pub struct PortfolioQuery {
    pub since: Option<String>,

    /// With `coauthors=true` the stored-procedure variant runs and each
    /// row carries a co-author name list.
    #[serde(default)]
    pub coauthors: bool,
}

/// Papers per project for an author since a date (default 2018-01-01)
pub async fn portfolio(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<PortfolioQuery>,
) -> Result<Response> {
    let since = query
        .since
        .unwrap_or_else(|| DEFAULT_PORTFOLIO_SINCE.to_string());

    if query.coauthors {
        let rows = state.repo.author_portfolio_proc(&user_id, &since).await?;
        Ok(Json(rows).into_response())
    } else {
        let rows = state.repo.author_portfolio(&user_id, &since).await?;
        Ok(Json(rows).into_response())
    }
}

/// Aggregated publication and review activity for an author
pub async fn insights(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<AuthorInsights>> {
    let insights = state.repo.author_insights(&user_id).await?;
    Ok(Json(insights))
}
