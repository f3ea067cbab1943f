// handlers/protected/projects.rs - GET /api/projects?search=

use axum::extract::{Query, State};
use serde::Deserialize;

use crate::database::models::{Project, ProjectView};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{projects, resource};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

/// Newest first; `search` is a case-insensitive substring match on title, description and tags
pub async fn list(State(state): State<AppState>, Query(query): Query<SearchQuery>) -> ApiResult<Vec<ProjectView>> {
    let views = resource::list::<Project>(&state.store, &projects::list_query(query.search)).await?;
    Ok(ApiResponse::success(views))
}
