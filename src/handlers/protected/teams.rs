// handlers/protected/teams.rs - GET /api/teams?search=

use axum::extract::{Query, State};

use super::projects::SearchQuery;
use crate::database::models::{Team, TeamView};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{resource, teams};
use crate::state::AppState;

pub async fn list(State(state): State<AppState>, Query(query): Query<SearchQuery>) -> ApiResult<Vec<TeamView>> {
    let views = resource::list::<Team>(&state.store, &teams::list_query(query.search)).await?;
    Ok(ApiResponse::success(views))
}
