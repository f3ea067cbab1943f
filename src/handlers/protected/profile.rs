// handlers/protected/profile.rs - GET/PUT /api/auth/profile

use axum::extract::{Extension, State};

use crate::database::models::{ProfileInput, UserProfile};
use crate::handlers::utils::JsonBody;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::accounts;
use crate::state::AppState;

pub async fn profile_get(State(state): State<AppState>, Extension(user): Extension<AuthUser>) -> ApiResult<UserProfile> {
    Ok(ApiResponse::success(accounts::profile(&state.store, &user).await?))
}

/// Merge update; email and credentials are not editable here
pub async fn profile_put(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    JsonBody(input): JsonBody<ProfileInput>,
) -> ApiResult<UserProfile> {
    Ok(ApiResponse::success(accounts::update_profile(&state.store, &user, input).await?))
}
