//! Database layer for PaperScope
//!
//! Provides:
//! - SeaORM entity models
//! - Repository pattern for data access
//! - Connection pool management

pub mod models;
mod repository;

pub use repository::{
    fresh_id, validate_limit, validate_page, AdvancedUserPaperRow, AssignedReviewRow,
    AuthorInsights, BatchCreateSummary, BatchVenueSummaryRow, CatalogPaper, InsightsSummary,
    NewPaperInput, PaperDetail, PaperListItem, PaperListPage, Pagination, PortfolioProcRow,
    PortfolioRow, Repository, ReviewRow, ReviewableRow, ReviewerActivityRow, ReviewerRow,
    StatusBreakdownRow, TopReviewedPaperRow, UpdatePaperInput, VenueActivityRow,
    VenueBreakdownRow, YearlyStatRow, DEFAULT_PAGE_LIMIT, MAX_PAGE, MAX_PAGE_LIMIT,
};

use crate::config::DatabaseConfig;
use crate::errors::{AppError, Result};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

/// Database connection pool wrapper
///
/// One bounded pool against either a TCP endpoint or a Cloud SQL unix
/// socket; acquisition queues once the pool is exhausted.
#[derive(Clone)]
pub struct DbPool {
    conn: DatabaseConnection,
}

impl DbPool {
    /// Create a new database pool from configuration
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        info!(
            database = %config.database,
            socket = config.socket_path.is_some(),
            "Connecting to database..."
        );

        let mut opts = ConnectOptions::new(config.connection_url());
        opts.max_connections(config.max_connections)
            .connect_timeout(config.connect_timeout())
            .idle_timeout(std::time::Duration::from_secs(config.idle_timeout_secs))
            .sqlx_logging(true);

        let conn = Database::connect(opts)
            .await
            .map_err(|e| AppError::DatabaseConnection {
                message: format!("Failed to connect: {}", e),
            })?;

        info!("Database connection established");

        Ok(Self { conn })
    }

    /// Get the underlying connection handle
    pub fn conn(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Ping the database to check connectivity
    pub async fn ping(&self) -> Result<()> {
        use sea_orm::ConnectionTrait;

        self.conn
            .execute_unprepared("SELECT 1")
            .await
            .map_err(|e| AppError::DatabaseConnection {
                message: format!("Ping failed: {}", e),
            })?;

        Ok(())
    }
}
