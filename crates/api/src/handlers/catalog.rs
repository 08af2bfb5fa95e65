//! Reference-list handlers for projects, datasets and users
//!
//! These feed the create-paper forms. User rows serialize without the
//! password column.

use axum::{extract::State, Json};

use crate::AppState;
use paperscope_common::db::models::{Dataset, Project, User};
use paperscope_common::errors::Result;

pub async fn list_projects(State(state): State<AppState>) -> Result<Json<Vec<Project>>> {
    let projects = state.repo.projects_all().await?;
    Ok(Json(projects))
}

pub async fn list_datasets(State(state): State<AppState>) -> Result<Json<Vec<Dataset>>> {
    let datasets = state.repo.datasets_all().await?;
    Ok(Json(datasets))
}

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>> {
    let users = state.repo.users_all().await?;
    Ok(Json(users))
}
