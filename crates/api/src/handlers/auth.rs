//! Login handler
//!
//! Credentials live in the application database; the lookup is a single
//! parameterized comparison and a failed match is indistinguishable from
//! an unknown user.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppState;
use paperscope_common::errors::{AppError, Result};

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "user_id is required"))]
    pub user_id: String,

    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_id: String,
    pub user_name: String,
    pub email: String,
    pub affiliation: Option<String>,
    pub is_reviewer: bool,
}

/// Authenticate a user; the response carries the reviewer flag the
/// front end uses to unlock review views.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: None,
    })?;

    let user = state
        .repo
        .find_user_for_login(&request.user_id, &request.password)
        .await?
        .ok_or_else(|| AppError::Unauthorized {
            message: "invalid user id or password".into(),
        })?;

    tracing::info!(user_id = %user.user_id, "User logged in");

    Ok(Json(LoginResponse {
        user_id: user.user_id,
        user_name: user.user_name,
        email: user.email,
        affiliation: user.affiliation,
        is_reviewer: user.is_reviewer,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_credentials_rejected() {
        let request = LoginRequest {
            user_id: "".into(),
            password: "pw".into(),
        };
        assert!(request.validate().is_err());

        let request = LoginRequest {
            user_id: "U001".into(),
            password: "".into(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_present_credentials_accepted() {
        let request = LoginRequest {
            user_id: "U001".into(),
            password: "pw".into(),
        };
        assert!(request.validate().is_ok());
    }
}
