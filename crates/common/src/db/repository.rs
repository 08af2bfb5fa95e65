//! Repository pattern for database operations
//!
//! One method per API operation. Every statement is fixed and
//! parameterized; the only interpolations are LIMIT/OFFSET values that
//! have been validated as bounded integers, and IN-list placeholders
//! generated to match slice length.

use crate::db::models::*;
use crate::db::DbPool;
use crate::errors::{AppError, Result};
use crate::metrics;
use chrono::NaiveDateTime;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend,
    EntityTrait, FromQueryResult, IsolationLevel, PaginatorTrait, QueryFilter, QueryOrder, Set,
    Statement, TransactionTrait, Value,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Instant;
use uuid::Uuid;

/// Hard bounds on pagination values; validated before the values are
/// interpolated into LIMIT/OFFSET. The page bound keeps the offset
/// computation (`(page - 1) * limit`) well inside u64 range.
pub const MAX_PAGE_LIMIT: u64 = 100;
pub const DEFAULT_PAGE_LIMIT: u64 = 20;
pub const MAX_PAGE: u64 = 1_000_000;

/// Listing row for paper queries joined against venues
#[derive(Debug, Clone, Serialize, Deserialize, FromQueryResult)]
pub struct PaperListItem {
    pub paper_id: String,
    pub paper_title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub pdf_url: Option<String>,
    pub upload_timestamp: Option<NaiveDateTime>,
    pub status: String,
    pub venue_name: Option<String>,
    pub year: Option<i32>,
}

/// Single-paper detail with aggregated review stats
#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct PaperDetail {
    pub paper_id: String,
    pub paper_title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub pdf_url: Option<String>,
    pub upload_timestamp: Option<NaiveDateTime>,
    pub status: String,
    pub venue_name: Option<String>,
    pub year: Option<i32>,
    pub review_count: i64,
    pub last_review_at: Option<NaiveDateTime>,
}

/// Pagination envelope fields, consistent with the count query executed
/// under the same filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    #[serde(rename = "totalPages")]
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        let total_pages = if total == 0 { 0 } else { total.div_ceil(limit) };
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

/// A page of papers plus its envelope
#[derive(Debug, Serialize)]
pub struct PaperListPage {
    pub papers: Vec<PaperListItem>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct VenueActivityRow {
    pub venue_id: String,
    pub venue_name: String,
    pub year: Option<i32>,
    pub total_papers: i64,
}

/// Venue aggregation with type and publisher (analytical query 2)
#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct VenueBreakdownRow {
    pub venue_id: String,
    pub venue_name: String,
    pub venue_type: Option<String>,
    pub publisher: Option<String>,
    pub year: Option<i32>,
    pub total_papers: i64,
}

#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct PortfolioRow {
    pub project_id: String,
    pub project_title: String,
    pub paper_id: String,
    pub paper_title: String,
    pub upload_timestamp: Option<NaiveDateTime>,
    pub review_count: i64,
}

/// Portfolio row from `sp_author_portfolio`, with co-author names
#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct PortfolioProcRow {
    pub project_id: String,
    pub project_title: String,
    pub paper_id: String,
    pub paper_title: String,
    pub upload_timestamp: Option<NaiveDateTime>,
    pub review_count: i64,
    pub co_authors: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct ReviewerRow {
    pub user_id: String,
    pub user_name: String,
    pub affiliation: Option<String>,
    pub total_reviews: i64,
}

/// Reviewer aggregation with distinct papers (analytical query 3)
#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct ReviewerActivityRow {
    pub user_id: String,
    pub user_name: String,
    pub affiliation: Option<String>,
    pub total_reviews_received: i64,
    pub papers_reviewed: i64,
}

/// Authored-paper row with review stats (analytical queries 1 and 4)
#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct AdvancedUserPaperRow {
    pub paper_id: String,
    pub paper_title: String,
    pub upload_timestamp: Option<NaiveDateTime>,
    pub status: String,
    pub review_count: i64,
    pub last_review_at: Option<NaiveDateTime>,
}

/// Paper row in the reviewer's queue; `has_reviewed` is 0/1 from SQL
#[derive(Debug, Clone, FromQueryResult)]
pub struct ReviewableRow {
    pub paper_id: String,
    pub paper_title: String,
    pub abstract_text: Option<String>,
    pub pdf_url: Option<String>,
    pub upload_timestamp: Option<NaiveDateTime>,
    pub status: String,
    pub venue_name: Option<String>,
    pub year: Option<i32>,
    pub review_count: i64,
    pub last_review_at: Option<NaiveDateTime>,
    pub has_reviewed: i64,
}

/// Authored paper currently in review, same shape without the flag
#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct AssignedReviewRow {
    pub paper_id: String,
    pub paper_title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub pdf_url: Option<String>,
    pub upload_timestamp: Option<NaiveDateTime>,
    pub status: String,
    pub venue_name: Option<String>,
    pub year: Option<i32>,
    pub review_count: i64,
    pub last_review_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct ReviewRow {
    pub review_id: String,
    pub user_id: String,
    pub user_name: String,
    pub comment: Option<String>,
    pub review_timestamp: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InsightsSummary {
    pub total_papers: i64,
    pub total_reviews: i64,
    pub avg_reviews_per_paper: f64,
}

#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct TopReviewedPaperRow {
    pub paper_id: String,
    pub paper_title: String,
    pub pdf_url: Option<String>,
    pub review_count: i64,
    pub last_review_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct YearlyStatRow {
    pub year: i32,
    pub papers: i64,
    pub reviews: i64,
}

#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct StatusBreakdownRow {
    pub status: String,
    pub count: i64,
}

/// Aggregated author activity for the insights view
#[derive(Debug, Clone, Serialize)]
pub struct AuthorInsights {
    pub summary: Option<InsightsSummary>,
    pub top_reviewed_papers: Vec<TopReviewedPaperRow>,
    pub yearly_stats: Vec<YearlyStatRow>,
    pub status_breakdown: Vec<StatusBreakdownRow>,
}

/// Minimal paper projection fed to the recommendation adapter
#[derive(Debug, Clone, FromQueryResult)]
pub struct CatalogPaper {
    pub paper_id: String,
    pub paper_title: String,
    pub abstract_text: Option<String>,
}

/// Input for the single and batch paper creation transactions
#[derive(Debug, Clone, Deserialize)]
pub struct NewPaperInput {
    pub paper_title: String,
    pub abstract_text: Option<String>,
    pub pdf_url: String,
    pub status: PaperStatus,
    pub venue_id: String,
    pub project_id: Option<String>,
    pub dataset_id: Option<String>,
    pub author_ids: Vec<String>,
}

/// Mutable paper fields for the update statement
#[derive(Debug, Clone)]
pub struct UpdatePaperInput {
    pub paper_title: String,
    pub abstract_text: Option<String>,
    pub pdf_url: Option<String>,
    pub status: PaperStatus,
    pub venue_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct BatchVenueSummaryRow {
    pub venue_name: Option<String>,
    pub num_created: i64,
}

/// Outcome of the batch creation transaction
#[derive(Debug, Serialize)]
pub struct BatchCreateSummary {
    pub created_count: usize,
    pub paper_ids: Vec<String>,
    pub summary: Vec<BatchVenueSummaryRow>,
}

/// Generate a fresh unique identifier with the schema's prefix convention
pub fn fresh_id(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string().to_uppercase();
    format!("{}{}", prefix, &suffix[..12])
}

/// Generate `?, ?, ...` to match an IN-list length
fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

/// Validate a page number (1-based)
pub fn validate_page(page: Option<u64>) -> Result<u64> {
    match page {
        None => Ok(1),
        Some(0) => Err(AppError::Validation {
            message: "page must be >= 1".into(),
            field: Some("page".into()),
        }),
        Some(p) if p > MAX_PAGE => Err(AppError::Validation {
            message: format!("page must be <= {}", MAX_PAGE),
            field: Some("page".into()),
        }),
        Some(p) => Ok(p),
    }
}

/// Validate a page size against the hard bound
pub fn validate_limit(limit: Option<u64>) -> Result<u64> {
    match limit {
        None => Ok(DEFAULT_PAGE_LIMIT),
        Some(0) => Err(AppError::Validation {
            message: "limit must be >= 1".into(),
            field: Some("limit".into()),
        }),
        Some(l) if l > MAX_PAGE_LIMIT => Err(AppError::Validation {
            message: format!("limit must be <= {}", MAX_PAGE_LIMIT),
            field: Some("limit".into()),
        }),
        Some(l) => Ok(l),
    }
}

/// Whether a database error is a trigger SIGNAL rejection. MySQL raises
/// these with SQLSTATE 45000 (driver error code 1644).
fn is_trigger_rejection(err: &sea_orm::DbErr) -> bool {
    let text = err.to_string();
    text.contains("45000") || text.contains("1644")
}

/// Ids that were requested but not found by an existence check
fn missing_ids(requested: &BTreeSet<String>, found: &[String]) -> Vec<String> {
    requested
        .iter()
        .filter(|id| !found.contains(id))
        .cloned()
        .collect()
}

fn mysql(sql: impl Into<String>, values: Vec<Value>) -> Statement {
    Statement::from_sql_and_values(DbBackend::MySql, sql.into(), values)
}

/// Repository for data access operations
#[derive(Clone)]
pub struct Repository {
    pool: DbPool,
}

impl Repository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> &DatabaseConnection {
        self.pool.conn()
    }

    // ========================================================================
    // Health Check
    // ========================================================================

    /// Ping the database
    pub async fn ping(&self) -> Result<()> {
        self.pool.ping().await
    }

    // ========================================================================
    // Paper Reads
    // ========================================================================

    /// Latest papers with venue, optional free-text search. Legacy shape:
    /// at most 20 rows, no envelope.
    pub async fn list_papers_latest(&self, search: Option<&str>) -> Result<Vec<PaperListItem>> {
        let start = Instant::now();

        let base = r#"
            SELECT
                p.paper_id, p.paper_title, p.`abstract` AS abstract_text, p.pdf_url,
                p.upload_timestamp, p.status,
                v.venue_name, v.year
            FROM Papers p
            LEFT JOIN Venues v ON v.venue_id = p.venue_id
        "#;
        let order_limit = " ORDER BY p.upload_timestamp DESC LIMIT 20";

        let stmt = match search {
            Some(term) if !term.trim().is_empty() => {
                let like = format!("%{}%", term.trim());
                mysql(
                    format!(
                        "{base} WHERE p.paper_title LIKE ? OR p.`abstract` LIKE ?{order_limit}"
                    ),
                    vec![like.clone().into(), like.into()],
                )
            }
            _ => mysql(format!("{base}{order_limit}"), vec![]),
        };

        let rows = PaperListItem::find_by_statement(stmt).all(self.conn()).await?;
        metrics::record_query("list_papers_latest", start.elapsed().as_secs_f64());
        Ok(rows)
    }

    /// Paginated paper listing with free-text, venue and status filters.
    /// The count query runs under the same filters so the envelope totals
    /// stay consistent.
    pub async fn list_papers_page(
        &self,
        q: Option<&str>,
        venue_id: Option<&str>,
        status: Option<&str>,
        page: u64,
        limit: u64,
    ) -> Result<PaperListPage> {
        let start = Instant::now();
        let offset = (page - 1) * limit;

        let mut filters = Vec::new();
        let mut values: Vec<Value> = Vec::new();

        if let Some(term) = q.filter(|t| !t.trim().is_empty()) {
            let like = format!("%{}%", term.trim());
            filters.push("(p.paper_title LIKE ? OR p.`abstract` LIKE ?)");
            values.push(like.clone().into());
            values.push(like.into());
        }
        if let Some(vid) = venue_id.filter(|v| !v.is_empty()) {
            filters.push("p.venue_id = ?");
            values.push(vid.into());
        }
        if let Some(st) = status.filter(|s| !s.is_empty()) {
            filters.push("p.status = ?");
            values.push(st.into());
        }

        let where_clause = if filters.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", filters.join(" AND "))
        };

        let count_sql = format!("SELECT COUNT(*) AS total FROM Papers p{where_clause}");
        let total = self
            .conn()
            .query_one(mysql(count_sql, values.clone()))
            .await?
            .map(|row| row.try_get_by::<i64, _>("total"))
            .transpose()?
            .unwrap_or(0) as u64;

        // page and limit were validated as bounded integers by the caller
        let list_sql = format!(
            r#"
            SELECT
                p.paper_id, p.paper_title, p.`abstract` AS abstract_text, p.pdf_url,
                p.upload_timestamp, p.status,
                v.venue_name, v.year
            FROM Papers p
            LEFT JOIN Venues v ON v.venue_id = p.venue_id
            {where_clause}
            ORDER BY p.upload_timestamp DESC
            LIMIT {limit} OFFSET {offset}
            "#
        );

        let papers = PaperListItem::find_by_statement(mysql(list_sql, values))
            .all(self.conn())
            .await?;

        metrics::record_query("list_papers_page", start.elapsed().as_secs_f64());
        Ok(PaperListPage {
            papers,
            pagination: Pagination::new(page, limit, total),
        })
    }

    /// Paper detail with review count and most recent review timestamp
    pub async fn paper_detail(&self, paper_id: &str) -> Result<PaperDetail> {
        let start = Instant::now();

        let stmt = mysql(
            r#"
            SELECT
                p.paper_id, p.paper_title, p.`abstract` AS abstract_text, p.pdf_url,
                p.upload_timestamp, p.status,
                v.venue_name, v.year,
                COUNT(r.review_id) AS review_count,
                MAX(r.review_timestamp) AS last_review_at
            FROM Papers p
            LEFT JOIN Venues v ON v.venue_id = p.venue_id
            LEFT JOIN Reviews r ON r.paper_id = p.paper_id
            WHERE p.paper_id = ?
            GROUP BY p.paper_id, p.paper_title, p.`abstract`, p.pdf_url,
                     p.upload_timestamp, p.status, v.venue_name, v.year
            "#,
            vec![paper_id.into()],
        );

        let detail = PaperDetail::find_by_statement(stmt)
            .one(self.conn())
            .await?
            .ok_or_else(|| AppError::NotFound {
                resource: "paper".into(),
                id: paper_id.into(),
            })?;

        metrics::record_query("paper_detail", start.elapsed().as_secs_f64());
        Ok(detail)
    }

    // ========================================================================
    // Reference Lists
    // ========================================================================

    pub async fn venues_all(&self) -> Result<Vec<Venue>> {
        VenueEntity::find()
            .order_by_asc(VenueColumn::VenueId)
            .all(self.conn())
            .await
            .map_err(Into::into)
    }

    pub async fn projects_all(&self) -> Result<Vec<Project>> {
        ProjectEntity::find()
            .order_by_asc(ProjectColumn::ProjectId)
            .all(self.conn())
            .await
            .map_err(Into::into)
    }

    pub async fn datasets_all(&self) -> Result<Vec<Dataset>> {
        DatasetEntity::find()
            .order_by_asc(DatasetColumn::DatasetId)
            .all(self.conn())
            .await
            .map_err(Into::into)
    }

    pub async fn users_all(&self) -> Result<Vec<User>> {
        UserEntity::find()
            .order_by_asc(UserColumn::UserId)
            .all(self.conn())
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Venue / Author / Reviewer Analytics
    // ========================================================================

    /// Published-paper counts per venue since a year
    pub async fn venue_activity(&self, since_year: i32) -> Result<Vec<VenueActivityRow>> {
        let stmt = mysql(
            r#"
            SELECT
                v.venue_id, v.venue_name, v.year,
                COUNT(p.paper_id) AS total_papers
            FROM Venues v
            JOIN Papers p ON p.venue_id = v.venue_id
            WHERE v.year >= ? AND p.status IN ('Published')
            GROUP BY v.venue_id, v.venue_name, v.year
            ORDER BY v.year DESC, total_papers DESC
            LIMIT 25
            "#,
            vec![since_year.into()],
        );

        VenueActivityRow::find_by_statement(stmt)
            .all(self.conn())
            .await
            .map_err(Into::into)
    }

    /// Author portfolio: papers per project since a date, with review counts
    pub async fn author_portfolio(&self, user_id: &str, since: &str) -> Result<Vec<PortfolioRow>> {
        let stmt = mysql(
            r#"
            SELECT
                pr.project_id, pr.project_title,
                p.paper_id, p.paper_title, p.upload_timestamp,
                COUNT(r.review_id) AS review_count
            FROM Authorship a
            JOIN Papers p   ON p.paper_id = a.paper_id
            JOIN Projects pr ON pr.project_id = p.project_id
            LEFT JOIN Reviews r ON r.paper_id = p.paper_id
            WHERE a.user_id = ? AND (p.upload_timestamp IS NULL OR p.upload_timestamp >= ?)
            GROUP BY pr.project_id, pr.project_title, p.paper_id, p.paper_title,
                     p.upload_timestamp
            ORDER BY p.upload_timestamp DESC, review_count DESC
            LIMIT 50
            "#,
            vec![user_id.into(), since.into()],
        );

        PortfolioRow::find_by_statement(stmt)
            .all(self.conn())
            .await
            .map_err(Into::into)
    }

    /// Portfolio via the stored procedure, which additionally returns
    /// co-author names per paper
    pub async fn author_portfolio_proc(
        &self,
        user_id: &str,
        since: &str,
    ) -> Result<Vec<PortfolioProcRow>> {
        let stmt = mysql(
            "CALL sp_author_portfolio(?, ?)",
            vec![user_id.into(), since.into()],
        );

        PortfolioProcRow::find_by_statement(stmt)
            .all(self.conn())
            .await
            .map_err(Into::into)
    }

    /// Top reviewers ranked by review count over a date window
    pub async fn top_reviewers(&self, from: &str, to: &str) -> Result<Vec<ReviewerRow>> {
        let stmt = mysql(
            r#"
            SELECT
                u.user_id, u.user_name, u.affiliation,
                COUNT(r.review_id) AS total_reviews
            FROM Users u
            JOIN Reviews r ON r.user_id = u.user_id
            WHERE r.review_timestamp BETWEEN ? AND ?
            GROUP BY u.user_id, u.user_name, u.affiliation
            HAVING COUNT(r.review_id) > 0
            ORDER BY total_reviews DESC, u.user_name ASC
            LIMIT 25
            "#,
            vec![
                format!("{from} 00:00:00").into(),
                format!("{to} 23:59:59").into(),
            ],
        );

        ReviewerRow::find_by_statement(stmt)
            .all(self.conn())
            .await
            .map_err(Into::into)
    }

    /// Aggregated publication and review activity for an author
    pub async fn author_insights(&self, user_id: &str) -> Result<AuthorInsights> {
        let start = Instant::now();

        let totals = self
            .conn()
            .query_one(mysql(
                r#"
                SELECT
                    COUNT(DISTINCT p.paper_id) AS total_papers,
                    COUNT(r.review_id) AS total_reviews
                FROM Authorship a
                JOIN Papers p ON p.paper_id = a.paper_id
                LEFT JOIN Reviews r ON r.paper_id = p.paper_id
                WHERE a.user_id = ?
                "#,
                vec![user_id.into()],
            ))
            .await?;

        let summary = match totals {
            Some(row) => {
                let total_papers: i64 = row.try_get_by("total_papers")?;
                let total_reviews: i64 = row.try_get_by("total_reviews")?;
                if total_papers == 0 {
                    None
                } else {
                    Some(InsightsSummary {
                        total_papers,
                        total_reviews,
                        avg_reviews_per_paper: total_reviews as f64 / total_papers as f64,
                    })
                }
            }
            None => None,
        };

        let top_reviewed_papers = TopReviewedPaperRow::find_by_statement(mysql(
            r#"
            SELECT
                p.paper_id, p.paper_title, p.pdf_url,
                COUNT(r.review_id) AS review_count,
                MAX(r.review_timestamp) AS last_review_at
            FROM Authorship a
            JOIN Papers p ON p.paper_id = a.paper_id
            LEFT JOIN Reviews r ON r.paper_id = p.paper_id
            WHERE a.user_id = ?
            GROUP BY p.paper_id, p.paper_title, p.pdf_url
            ORDER BY review_count DESC, last_review_at DESC
            LIMIT 5
            "#,
            vec![user_id.into()],
        ))
        .all(self.conn())
        .await?;

        let yearly_stats = YearlyStatRow::find_by_statement(mysql(
            r#"
            SELECT
                YEAR(p.upload_timestamp) AS year,
                COUNT(DISTINCT p.paper_id) AS papers,
                COUNT(r.review_id) AS reviews
            FROM Authorship a
            JOIN Papers p ON p.paper_id = a.paper_id
            LEFT JOIN Reviews r ON r.paper_id = p.paper_id
            WHERE a.user_id = ? AND p.upload_timestamp IS NOT NULL
            GROUP BY YEAR(p.upload_timestamp)
            ORDER BY year DESC
            "#,
            vec![user_id.into()],
        ))
        .all(self.conn())
        .await?;

        let status_breakdown = StatusBreakdownRow::find_by_statement(mysql(
            r#"
            SELECT p.status, COUNT(DISTINCT p.paper_id) AS count
            FROM Authorship a
            JOIN Papers p ON p.paper_id = a.paper_id
            WHERE a.user_id = ?
            GROUP BY p.status
            ORDER BY count DESC
            "#,
            vec![user_id.into()],
        ))
        .all(self.conn())
        .await?;

        metrics::record_query("author_insights", start.elapsed().as_secs_f64());
        Ok(AuthorInsights {
            summary,
            top_reviewed_papers,
            yearly_stats,
            status_breakdown,
        })
    }

    // ========================================================================
    // Review Reads
    // ========================================================================

    /// Papers a user may review: under review, not authored by the user,
    /// with a flag for papers already reviewed by them. Paginated.
    pub async fn reviewable_papers(
        &self,
        user_id: &str,
        venue_id: Option<&str>,
        q: Option<&str>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<ReviewableRow>, Pagination)> {
        let start = Instant::now();
        let offset = (page - 1) * limit;

        let mut filters = vec![
            "p.status IN ('Under Review', 'In Review')".to_string(),
            "p.paper_id NOT IN (SELECT a.paper_id FROM Authorship a WHERE a.user_id = ?)"
                .to_string(),
        ];
        let mut values: Vec<Value> = vec![user_id.into()];

        if let Some(vid) = venue_id.filter(|v| !v.is_empty()) {
            filters.push("p.venue_id = ?".to_string());
            values.push(vid.into());
        }
        if let Some(term) = q.filter(|t| !t.trim().is_empty()) {
            let like = format!("%{}%", term.trim());
            filters.push("(p.paper_title LIKE ? OR p.`abstract` LIKE ?)".to_string());
            values.push(like.clone().into());
            values.push(like.into());
        }
        let where_clause = filters.join(" AND ");

        let total = self
            .conn()
            .query_one(mysql(
                format!("SELECT COUNT(*) AS total FROM Papers p WHERE {where_clause}"),
                values.clone(),
            ))
            .await?
            .map(|row| row.try_get_by::<i64, _>("total"))
            .transpose()?
            .unwrap_or(0) as u64;

        // the leading ? feeds the has_reviewed probe
        let mut list_values: Vec<Value> = vec![user_id.into()];
        list_values.extend(values);

        let list_sql = format!(
            r#"
            SELECT
                p.paper_id, p.paper_title, p.`abstract` AS abstract_text, p.pdf_url,
                p.upload_timestamp, p.status,
                v.venue_name, v.year,
                COUNT(DISTINCT r.review_id) AS review_count,
                MAX(r.review_timestamp) AS last_review_at,
                EXISTS (
                    SELECT 1 FROM Reviews rev
                    WHERE rev.paper_id = p.paper_id AND rev.user_id = ?
                ) AS has_reviewed
            FROM Papers p
            LEFT JOIN Venues v ON v.venue_id = p.venue_id
            LEFT JOIN Reviews r ON r.paper_id = p.paper_id
            WHERE {where_clause}
            GROUP BY p.paper_id, p.paper_title, p.`abstract`, p.pdf_url,
                     p.upload_timestamp, p.status, v.venue_name, v.year
            ORDER BY p.upload_timestamp DESC
            LIMIT {limit} OFFSET {offset}
            "#
        );

        let rows = ReviewableRow::find_by_statement(mysql(list_sql, list_values))
            .all(self.conn())
            .await?;

        metrics::record_query("reviewable_papers", start.elapsed().as_secs_f64());
        Ok((rows, Pagination::new(page, limit, total)))
    }

    /// Papers authored by the user that are currently in review
    pub async fn papers_in_review(&self, user_id: &str) -> Result<Vec<AssignedReviewRow>> {
        let stmt = mysql(
            r#"
            SELECT
                p.paper_id, p.paper_title, p.`abstract` AS abstract_text, p.pdf_url,
                p.upload_timestamp, p.status,
                v.venue_name, v.year,
                COUNT(r.review_id) AS review_count,
                MAX(r.review_timestamp) AS last_review_at
            FROM Authorship a
            INNER JOIN Papers p ON a.paper_id = p.paper_id
            LEFT JOIN Venues v ON v.venue_id = p.venue_id
            LEFT JOIN Reviews r ON p.paper_id = r.paper_id
            WHERE a.user_id = ? AND p.status IN ('Under Review', 'In Review')
            GROUP BY p.paper_id, p.paper_title, p.`abstract`, p.pdf_url,
                     p.upload_timestamp, p.status, v.venue_name, v.year
            ORDER BY p.upload_timestamp DESC
            "#,
            vec![user_id.into()],
        );

        AssignedReviewRow::find_by_statement(stmt)
            .all(self.conn())
            .await
            .map_err(Into::into)
    }

    /// Papers a reviewer can pick up: user must exist; non-reviewers get an
    /// empty list rather than an error.
    pub async fn assigned_reviews(&self, user_id: &str) -> Result<Vec<ReviewableRow>> {
        let user = UserEntity::find_by_id(user_id)
            .one(self.conn())
            .await?
            .ok_or_else(|| AppError::NotFound {
                resource: "user".into(),
                id: user_id.into(),
            })?;

        if !user.is_reviewer {
            return Ok(Vec::new());
        }

        let stmt = mysql(
            r#"
            SELECT
                p.paper_id, p.paper_title, p.`abstract` AS abstract_text, p.pdf_url,
                p.upload_timestamp, p.status,
                v.venue_name, v.year,
                COUNT(DISTINCT r.review_id) AS review_count,
                MAX(r.review_timestamp) AS last_review_at,
                EXISTS (
                    SELECT 1 FROM Reviews rev
                    WHERE rev.paper_id = p.paper_id AND rev.user_id = ?
                ) AS has_reviewed
            FROM Papers p
            LEFT JOIN Venues v ON v.venue_id = p.venue_id
            LEFT JOIN Reviews r ON p.paper_id = r.paper_id
            WHERE p.status IN ('Under Review', 'In Review')
              AND p.paper_id NOT IN (
                  SELECT a.paper_id FROM Authorship a WHERE a.user_id = ?
              )
            GROUP BY p.paper_id, p.paper_title, p.`abstract`, p.pdf_url,
                     p.upload_timestamp, p.status, v.venue_name, v.year
            ORDER BY p.upload_timestamp DESC
            "#,
            vec![user_id.into(), user_id.into()],
        );

        ReviewableRow::find_by_statement(stmt)
            .all(self.conn())
            .await
            .map_err(Into::into)
    }

    /// Reviews for a paper joined to reviewer names
    pub async fn reviews_for_paper(&self, paper_id: &str) -> Result<Vec<ReviewRow>> {
        let stmt = mysql(
            r#"
            SELECT
                r.review_id, r.user_id, u.user_name, r.comment, r.review_timestamp
            FROM Reviews r
            JOIN Users u ON u.user_id = r.user_id
            WHERE r.paper_id = ?
            ORDER BY r.review_timestamp DESC
            "#,
            vec![paper_id.into()],
        );

        ReviewRow::find_by_statement(stmt)
            .all(self.conn())
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Advanced Analytical Queries
    // ========================================================================

    /// Query 1: user's project papers uploaded since a year, with review counts
    pub async fn advanced_user_papers_by_year(
        &self,
        user_id: &str,
        year: i32,
    ) -> Result<Vec<AdvancedUserPaperRow>> {
        let stmt = mysql(
            r#"
            SELECT
                p.paper_id, p.paper_title, p.upload_timestamp, p.status,
                COUNT(r.review_id) AS review_count,
                MAX(r.review_timestamp) AS last_review_at
            FROM Authorship a
            INNER JOIN Papers p ON a.paper_id = p.paper_id
            LEFT JOIN Reviews r ON p.paper_id = r.paper_id
            WHERE a.user_id = ?
              AND p.upload_timestamp >= ?
              AND p.project_id IS NOT NULL
            GROUP BY p.paper_id, p.paper_title, p.upload_timestamp, p.status
            ORDER BY p.upload_timestamp DESC, review_count DESC
            LIMIT 15
            "#,
            vec![user_id.into(), format!("{year}-01-01 00:00:00").into()],
        );

        AdvancedUserPaperRow::find_by_statement(stmt)
            .all(self.conn())
            .await
            .map_err(Into::into)
    }

    /// Query 2: published-paper counts per venue with type and publisher
    pub async fn advanced_venues_by_year(&self, year: i32) -> Result<Vec<VenueBreakdownRow>> {
        let stmt = mysql(
            r#"
            SELECT
                v.venue_id, v.venue_name, v.venue_type, v.publisher, v.year,
                COUNT(p.paper_id) AS total_papers
            FROM Venues v
            INNER JOIN Papers p ON v.venue_id = p.venue_id
            WHERE v.year >= ? AND p.status = 'Published'
            GROUP BY v.venue_id, v.venue_name, v.venue_type, v.publisher, v.year
            ORDER BY v.year DESC, total_papers DESC
            LIMIT 15
            "#,
            vec![year.into()],
        );

        VenueBreakdownRow::find_by_statement(stmt)
            .all(self.conn())
            .await
            .map_err(Into::into)
    }

    /// Query 3: reviewers ranked by reviews received on papers they authored
    pub async fn advanced_top_reviewers(
        &self,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<ReviewerActivityRow>> {
        let stmt = mysql(
            r#"
            SELECT
                u.user_id, u.user_name, u.affiliation,
                COUNT(r.review_id) AS total_reviews_received,
                COUNT(DISTINCT a.paper_id) AS papers_reviewed
            FROM Reviews r
            INNER JOIN Authorship a ON r.paper_id = a.paper_id
            INNER JOIN Users u ON a.user_id = u.user_id
            WHERE r.review_timestamp BETWEEN ? AND ?
              AND u.is_reviewer = true
            GROUP BY u.user_id, u.user_name, u.affiliation
            HAVING COUNT(r.review_id) > 0
            ORDER BY total_reviews_received DESC
            LIMIT 15
            "#,
            vec![
                format!("{start_date} 00:00:00").into(),
                format!("{end_date} 23:59:59").into(),
            ],
        );

        ReviewerActivityRow::find_by_statement(stmt)
            .all(self.conn())
            .await
            .map_err(Into::into)
    }

    /// Query 4: user's papers ranked by review activity
    pub async fn advanced_user_paper_reviews(
        &self,
        user_id: &str,
    ) -> Result<Vec<AdvancedUserPaperRow>> {
        let stmt = mysql(
            r#"
            SELECT
                p.paper_id, p.paper_title, p.upload_timestamp, p.status,
                COUNT(r.review_id) AS review_count,
                MAX(r.review_timestamp) AS last_review_at
            FROM Authorship a
            INNER JOIN Papers p ON a.paper_id = p.paper_id
            LEFT JOIN Reviews r ON p.paper_id = r.paper_id
            WHERE a.user_id = ?
            GROUP BY p.paper_id, p.paper_title, p.upload_timestamp, p.status
            ORDER BY review_count DESC, last_review_at DESC
            LIMIT 15
            "#,
            vec![user_id.into()],
        );

        AdvancedUserPaperRow::find_by_statement(stmt)
            .all(self.conn())
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Auth
    // ========================================================================

    /// Credential lookup. The schema stores passwords in plaintext; the
    /// comparison happens in the parameterized statement.
    pub async fn find_user_for_login(
        &self,
        user_id: &str,
        password: &str,
    ) -> Result<Option<User>> {
        UserEntity::find()
            .filter(UserColumn::UserId.eq(user_id))
            .filter(UserColumn::Password.eq(password))
            .one(self.conn())
            .await
            .map_err(Into::into)
    }

    /// Whether the user authored the paper
    pub async fn user_is_author(&self, user_id: &str, paper_id: &str) -> Result<bool> {
        let count = AuthorshipEntity::find()
            .filter(AuthorshipColumn::UserId.eq(user_id))
            .filter(AuthorshipColumn::PaperId.eq(paper_id))
            .count(self.conn())
            .await?;
        Ok(count > 0)
    }

    // ========================================================================
    // Paper Writes
    // ========================================================================

    /// Create one paper and its authorship rows in a single READ COMMITTED
    /// transaction: either 1 paper + N authorship rows are committed, or
    /// nothing is.
    pub async fn create_paper_with_authors(&self, input: NewPaperInput) -> Result<String> {
        let start = Instant::now();

        let txn = self
            .conn()
            .begin_with_config(Some(IsolationLevel::ReadCommitted), None)
            .await?;

        Self::check_references(&txn, std::slice::from_ref(&input)).await?;
        Self::check_duplicates(&txn, std::slice::from_ref(&input)).await?;

        let paper_id = Self::insert_paper(&txn, &input).await?;

        txn.commit().await?;

        metrics::record_papers_created(1, "single");
        metrics::record_query("create_paper_with_authors", start.elapsed().as_secs_f64());
        Ok(paper_id)
    }

    /// Batch-create papers with authors. The whole batch commits or none
    /// of it does:
    /// 1. referenced venue/project/dataset/author ids verified per set
    ///    with one IN (...) query each;
    /// 2. one SELECT ... FOR UPDATE over all (venue_id, title) pairs takes
    ///    write-intent locks and detects duplicates;
    /// 3. sequential paper + authorship inserts with fresh ids;
    /// 4. per-venue created-count aggregation for the response summary.
    pub async fn batch_create_papers(
        &self,
        inputs: Vec<NewPaperInput>,
    ) -> Result<BatchCreateSummary> {
        let start = Instant::now();

        let txn = self
            .conn()
            .begin_with_config(Some(IsolationLevel::ReadCommitted), None)
            .await?;

        Self::check_references(&txn, &inputs).await?;
        Self::check_duplicates(&txn, &inputs).await?;

        let mut paper_ids = Vec::with_capacity(inputs.len());
        for input in &inputs {
            paper_ids.push(Self::insert_paper(&txn, input).await?);
        }

        let summary_sql = format!(
            r#"
            SELECT v.venue_name, COUNT(*) AS num_created
            FROM Papers p
            LEFT JOIN Venues v ON v.venue_id = p.venue_id
            WHERE p.paper_id IN ({})
            GROUP BY v.venue_name
            ORDER BY num_created DESC
            "#,
            placeholders(paper_ids.len())
        );
        let summary_values: Vec<Value> = paper_ids.iter().map(|id| id.clone().into()).collect();
        let summary = BatchVenueSummaryRow::find_by_statement(mysql(summary_sql, summary_values))
            .all(&txn)
            .await?;

        txn.commit().await?;

        metrics::record_papers_created(paper_ids.len() as u64, "batch");
        metrics::record_query("batch_create_papers", start.elapsed().as_secs_f64());
        Ok(BatchCreateSummary {
            created_count: paper_ids.len(),
            paper_ids,
            summary,
        })
    }

    /// Verify every referenced venue/project/dataset/author id exists.
    /// Any missing identifier aborts (rollback happens on drop).
    async fn check_references<C: ConnectionTrait>(
        conn: &C,
        inputs: &[NewPaperInput],
    ) -> Result<()> {
        let venues: BTreeSet<String> = inputs.iter().map(|p| p.venue_id.clone()).collect();
        let projects: BTreeSet<String> =
            inputs.iter().filter_map(|p| p.project_id.clone()).collect();
        let datasets: BTreeSet<String> =
            inputs.iter().filter_map(|p| p.dataset_id.clone()).collect();
        let authors: BTreeSet<String> =
            inputs.iter().flat_map(|p| p.author_ids.iter().cloned()).collect();

        let checks: [(&str, &str, &BTreeSet<String>); 4] = [
            ("Venues", "venue_id", &venues),
            ("Projects", "project_id", &projects),
            ("Datasets", "dataset_id", &datasets),
            ("Users", "user_id", &authors),
        ];

        for (table, column, ids) in checks {
            if ids.is_empty() {
                continue;
            }
            let sql = format!(
                "SELECT {column} AS id FROM {table} WHERE {column} IN ({})",
                placeholders(ids.len())
            );
            let values: Vec<Value> = ids.iter().map(|id| id.clone().into()).collect();

            let found: Vec<String> = conn
                .query_all(mysql(sql, values))
                .await?
                .into_iter()
                .map(|row| row.try_get_by::<String, _>("id"))
                .collect::<std::result::Result<_, _>>()?;

            let missing = missing_ids(ids, &found);
            if !missing.is_empty() {
                return Err(AppError::Validation {
                    message: format!(
                        "Unknown {} id(s): {}",
                        column.trim_end_matches("_id"),
                        missing.join(", ")
                    ),
                    field: Some(column.into()),
                });
            }
        }

        Ok(())
    }

    /// Probe existing (venue_id, title) pairs under FOR UPDATE. A hit means
    /// a duplicate; the lock serializes concurrent creators of the same pair.
    async fn check_duplicates<C: ConnectionTrait>(
        conn: &C,
        inputs: &[NewPaperInput],
    ) -> Result<()> {
        let pairs = inputs
            .iter()
            .map(|_| "(p.venue_id = ? AND p.paper_title = ?)")
            .collect::<Vec<_>>()
            .join(" OR ");
        let sql = format!(
            "SELECT p.paper_title FROM Papers p WHERE {pairs} FOR UPDATE"
        );

        let mut values: Vec<Value> = Vec::with_capacity(inputs.len() * 2);
        for input in inputs {
            values.push(input.venue_id.clone().into());
            values.push(input.paper_title.clone().into());
        }

        let conflicting: Vec<String> = conn
            .query_all(mysql(sql, values))
            .await?
            .into_iter()
            .map(|row| row.try_get_by::<String, _>("paper_title"))
            .collect::<std::result::Result<_, _>>()?;

        if !conflicting.is_empty() {
            return Err(AppError::Duplicate {
                message: format!(
                    "Duplicate (venue, title) pair(s): {}",
                    conflicting.join(", ")
                ),
                duplicates: conflicting,
            });
        }

        Ok(())
    }

    /// Insert one paper and its authorship rows with a fresh identifier
    async fn insert_paper<C: ConnectionTrait>(conn: &C, input: &NewPaperInput) -> Result<String> {
        let paper_id = fresh_id("P");
        let now = chrono::Utc::now().naive_utc();

        let paper = PaperActiveModel {
            paper_id: Set(paper_id.clone()),
            paper_title: Set(input.paper_title.clone()),
            abstract_text: Set(input.abstract_text.clone()),
            pdf_url: Set(Some(input.pdf_url.clone())),
            upload_timestamp: Set(Some(now)),
            status: Set(input.status.clone()),
            venue_id: Set(Some(input.venue_id.clone())),
            project_id: Set(input.project_id.clone()),
            dataset_id: Set(input.dataset_id.clone()),
        };
        paper.insert(conn).await?;

        for author_id in &input.author_ids {
            let authorship = AuthorshipActiveModel {
                user_id: Set(author_id.clone()),
                paper_id: Set(paper_id.clone()),
            };
            authorship.insert(conn).await?;
        }

        Ok(paper_id)
    }

    /// Update a paper's mutable fields. Trigger rejections (e.g. the
    /// AI-draft promotion gate) surface as validation errors.
    pub async fn update_paper(&self, paper_id: &str, input: UpdatePaperInput) -> Result<()> {
        let exists = PaperEntity::find_by_id(paper_id).one(self.conn()).await?;
        if exists.is_none() {
            return Err(AppError::NotFound {
                resource: "paper".into(),
                id: paper_id.into(),
            });
        }

        let stmt = mysql(
            r#"
            UPDATE Papers
            SET paper_title = ?, `abstract` = ?, pdf_url = ?, status = ?, venue_id = ?
            WHERE paper_id = ?
            "#,
            vec![
                input.paper_title.into(),
                input.abstract_text.into(),
                input.pdf_url.into(),
                input.status.into_value().into(),
                input.venue_id.into(),
                paper_id.into(),
            ],
        );

        self.conn().execute(stmt).await.map_err(|e| {
            // trigger SIGNAL text (promotion gate, duplicate title) is a
            // client problem; everything else stays a database error
            if is_trigger_rejection(&e) {
                AppError::Validation {
                    message: e.to_string(),
                    field: None,
                }
            } else {
                AppError::Database(e)
            }
        })?;

        Ok(())
    }

    /// Delete a paper via the cascading stored procedure. Ownership is
    /// checked here so a non-author gets 403 instead of a raw SQL signal.
    pub async fn delete_paper(&self, paper_id: &str, user_id: &str) -> Result<()> {
        let exists = PaperEntity::find_by_id(paper_id).one(self.conn()).await?;
        if exists.is_none() {
            return Err(AppError::NotFound {
                resource: "paper".into(),
                id: paper_id.into(),
            });
        }

        if !self.user_is_author(user_id, paper_id).await? {
            return Err(AppError::Forbidden {
                message: "Only an author may delete this paper".into(),
            });
        }

        // cascade: reviews, related-paper links, authorship, then the paper
        let stmt = mysql(
            "CALL sp_delete_paper(?, ?)",
            vec![user_id.into(), paper_id.into()],
        );
        self.conn().execute(stmt).await?;

        Ok(())
    }

    // ========================================================================
    // Reviews
    // ========================================================================

    /// Submit a review. Authors cannot review their own papers; the check
    /// runs here so the client sees 400 rather than a trigger signal.
    pub async fn submit_review(
        &self,
        paper_id: &str,
        user_id: &str,
        comment: &str,
    ) -> Result<String> {
        let paper = PaperEntity::find_by_id(paper_id).one(self.conn()).await?;
        if paper.is_none() {
            return Err(AppError::NotFound {
                resource: "paper".into(),
                id: paper_id.into(),
            });
        }

        if self.user_is_author(user_id, paper_id).await? {
            return Err(AppError::Validation {
                message: "Authors cannot review their own papers".into(),
                field: Some("user_id".into()),
            });
        }

        let review_id = fresh_id("R");
        let review = ReviewActiveModel {
            review_id: Set(review_id.clone()),
            user_id: Set(user_id.to_string()),
            paper_id: Set(paper_id.to_string()),
            comment: Set(Some(comment.to_string())),
            review_timestamp: Set(Some(chrono::Utc::now().naive_utc())),
        };
        review.insert(self.conn()).await?;

        metrics::record_review_submitted();
        Ok(review_id)
    }

    // ========================================================================
    // AI Drafts & Recommendations
    // ========================================================================

    /// Create an AI-draft paper row through the stored procedure, which
    /// links it to the source paper and the requesting user atomically.
    pub async fn create_ai_draft(
        &self,
        user_id: &str,
        source_paper_id: &str,
        paper_id: &str,
        title: &str,
        abstract_text: &str,
    ) -> Result<()> {
        let stmt = mysql(
            "CALL sp_create_ai_draft_paper(?, ?, ?, ?, ?)",
            vec![
                user_id.into(),
                source_paper_id.into(),
                paper_id.into(),
                title.into(),
                abstract_text.into(),
            ],
        );
        self.conn().execute(stmt).await?;
        Ok(())
    }

    /// Subject paper projection for the recommendation prompt
    pub async fn paper_for_recommendation(&self, paper_id: &str) -> Result<CatalogPaper> {
        let stmt = mysql(
            "SELECT paper_id, paper_title, `abstract` AS abstract_text FROM Papers WHERE paper_id = ?",
            vec![paper_id.into()],
        );

        CatalogPaper::find_by_statement(stmt)
            .one(self.conn())
            .await?
            .ok_or_else(|| AppError::NotFound {
                resource: "paper".into(),
                id: paper_id.into(),
            })
    }

    /// Candidate slice of the catalog, newest first, excluding the subject
    pub async fn catalog_candidates(
        &self,
        exclude_paper_id: &str,
        limit: usize,
    ) -> Result<Vec<CatalogPaper>> {
        let limit = limit.min(500);
        let sql = format!(
            r#"
            SELECT paper_id, paper_title, `abstract` AS abstract_text
            FROM Papers
            WHERE paper_id != ?
            ORDER BY upload_timestamp DESC
            LIMIT {limit}
            "#
        );

        CatalogPaper::find_by_statement(mysql(sql, vec![exclude_paper_id.into()]))
            .all(self.conn())
            .await
            .map_err(Into::into)
    }

    /// Fetch full listing rows for a set of ids, preserving the given order
    pub async fn papers_by_ids_ordered(&self, ids: &[String]) -> Result<Vec<PaperListItem>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let marks = placeholders(ids.len());
        let sql = format!(
            r#"
            SELECT
                p.paper_id, p.paper_title, p.`abstract` AS abstract_text, p.pdf_url,
                p.upload_timestamp, p.status,
                v.venue_name, v.year
            FROM Papers p
            LEFT JOIN Venues v ON v.venue_id = p.venue_id
            WHERE p.paper_id IN ({marks})
            ORDER BY FIELD(p.paper_id, {marks})
            "#
        );

        let mut values: Vec<Value> = Vec::with_capacity(ids.len() * 2);
        for id in ids.iter().chain(ids.iter()) {
            values.push(id.clone().into());
        }

        PaperListItem::find_by_statement(mysql(sql, values))
            .all(self.conn())
            .await
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_id_prefix_and_uniqueness() {
        let a = fresh_id("P");
        let b = fresh_id("P");
        assert!(a.starts_with('P'));
        assert_eq!(a.len(), 13);
        assert_ne!(a, b);
    }

    #[test]
    fn test_placeholders_match_list_length() {
        assert_eq!(placeholders(1), "?");
        assert_eq!(placeholders(3), "?, ?, ?");
    }

    #[test]
    fn test_page_validation() {
        assert_eq!(validate_page(None).unwrap(), 1);
        assert_eq!(validate_page(Some(7)).unwrap(), 7);
        assert!(validate_page(Some(0)).is_err());
    }

    #[test]
    fn test_page_bound_keeps_offset_in_range() {
        assert_eq!(validate_page(Some(MAX_PAGE)).unwrap(), MAX_PAGE);
        assert!(validate_page(Some(MAX_PAGE + 1)).is_err());
        assert!(validate_page(Some(u64::MAX)).is_err());

        // worst-case offset under the bounds cannot overflow
        let offset = (MAX_PAGE - 1).checked_mul(MAX_PAGE_LIMIT);
        assert!(offset.is_some());
    }

    #[test]
    fn test_limit_validation_bounds() {
        assert_eq!(validate_limit(None).unwrap(), DEFAULT_PAGE_LIMIT);
        assert_eq!(validate_limit(Some(100)).unwrap(), 100);
        assert!(validate_limit(Some(0)).is_err());
        assert!(validate_limit(Some(101)).is_err());
    }

    #[test]
    fn test_pagination_totals() {
        let p = Pagination::new(2, 20, 45);
        assert_eq!(p.total_pages, 3);

        let empty = Pagination::new(1, 20, 0);
        assert_eq!(empty.total_pages, 0);

        let exact = Pagination::new(1, 20, 40);
        assert_eq!(exact.total_pages, 2);
    }

    #[test]
    fn test_missing_ids_partition() {
        let requested: BTreeSet<String> =
            ["V001", "V002", "V003"].iter().map(|s| s.to_string()).collect();
        let found = vec!["V002".to_string()];
        assert_eq!(
            missing_ids(&requested, &found),
            vec!["V001".to_string(), "V003".to_string()]
        );
    }

    #[test]
    fn test_trigger_rejection_detection() {
        let signal = sea_orm::DbErr::Custom(
            "Execution Error: error returned from database: 1644 (45000): \
             AI_DRAFT papers need a PDF URL and a longer abstract"
                .into(),
        );
        assert!(is_trigger_rejection(&signal));

        let dropped = sea_orm::DbErr::Custom("connection reset by peer".into());
        assert!(!is_trigger_rejection(&dropped));
    }

    #[test]
    fn test_infrastructure_errors_stay_server_side() {
        let err = AppError::Database(sea_orm::DbErr::Custom(
            "connection reset by peer".into(),
        ));
        assert!(err.is_server_error());
        assert!(!err.public_message().contains("connection reset"));
    }

    #[test]
    fn test_missing_ids_empty_when_all_found() {
        let requested: BTreeSet<String> = ["U001"].iter().map(|s| s.to_string()).collect();
        let found = vec!["U001".to_string()];
        assert!(missing_ids(&requested, &found).is_empty());
    }
}
