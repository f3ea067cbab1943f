// handlers/protected/opportunities.rs - GET /api/opportunities?type=

use axum::extract::{Query, State};
use serde::Deserialize;

use crate::database::models::{Opportunity, OpportunityView};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{opportunities, resource};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct TypeQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

pub async fn list(State(state): State<AppState>, Query(query): Query<TypeQuery>) -> ApiResult<Vec<OpportunityView>> {
    let views = resource::list::<Opportunity>(&state.store, &opportunities::list_query(query.kind)).await?;
    Ok(ApiResponse::success(views))
}
