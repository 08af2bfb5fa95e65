//! PaperScope Common Library
//!
//! Shared code for the PaperScope services including:
//! - Database pool, entity models and repository
//! - Error types and HTTP status mapping
//! - Configuration management
//! - LLM recommendation adapter
//! - Metrics helpers

pub mod config;
pub mod db;
pub mod errors;
pub mod metrics;
pub mod recommend;

// Re-export commonly used types
pub use config::AppConfig;
pub use db::{DbPool, Repository};
pub use errors::{AppError, Result};
pub use recommend::Recommender;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default size of the catalog slice offered to the recommender
pub const DEFAULT_CANDIDATE_POOL: usize = 100;

/// Default number of recommendations returned
pub const DEFAULT_RECOMMENDATION_COUNT: usize = 10;
