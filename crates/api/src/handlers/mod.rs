//! HTTP request handlers
//!
//! Each handler validates its parameters, calls one repository method and
//! returns a typed response struct. Status translation lives entirely in
//! `AppError::into_response`.

pub mod advanced;
pub mod auth;
pub mod authors;
pub mod catalog;
pub mod health;
pub mod papers;
pub mod recommendations;
pub mod reviewers;
pub mod reviews;
pub mod venues;

use serde::Serialize;

/// Default analytics parameters, matching the seeded data window
pub const DEFAULT_SINCE_YEAR: i32 = 2018;
pub const DEFAULT_PORTFOLIO_SINCE: &str = "2018-01-01";
pub const DEFAULT_WINDOW_FROM: &str = "2024-01-01";
pub const DEFAULT_WINDOW_TO: &str = "2025-12-31";

/// Resolve an optional review-window pair to concrete dates
pub fn date_window(from: Option<String>, to: Option<String>) -> (String, String) {
    (
        from.unwrap_or_else(|| DEFAULT_WINDOW_FROM.to_string()),
        to.unwrap_or_else(|| DEFAULT_WINDOW_TO.to_string()),
    )
}

/// Generic acknowledgement body
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_defaults_apply_per_side() {
        let (from, to) = date_window(None, None);
        assert_eq!(from, DEFAULT_WINDOW_FROM);
        assert_eq!(to, DEFAULT_WINDOW_TO);

        let (from, to) = date_window(Some("2023-06-01".into()), None);
        assert_eq!(from, "2023-06-01");
        assert_eq!(to, DEFAULT_WINDOW_TO);
    }
}
