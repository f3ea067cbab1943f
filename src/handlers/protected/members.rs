// handlers/protected/members.rs - POST /:id/members and DELETE /:id/members/:userId

use axum::extract::{Extension, Path, State};
use serde::Deserialize;

use crate::error::ApiError;
use crate::handlers::utils::{parse_id, JsonBody};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::membership::{self, HasMembers};
use crate::state::AppState;
use crate::types::RecordId;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberBody {
    pub user_id: Option<String>,
}

pub async fn add<R: HasMembers>(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<AddMemberBody>,
) -> ApiResult<R::View> {
    let member: RecordId = match body.user_id.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => raw
            .parse()
            .map_err(|_| ApiError::field_error("userId", format!("`{}` is not a valid user id", raw)))?,
        _ => return Err(ApiError::field_error("userId", "`userId` is required")),
    };
    let id = parse_id(&id, R::TITLE)?;
    let view = membership::add_member::<R>(&state.store, id, member, &user).await?;
    Ok(ApiResponse::success(view))
}

/// A `userId` that isn't a valid id can't be a member, so removal is a no-op
pub async fn remove<R: HasMembers>(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((id, member)): Path<(String, String)>,
) -> ApiResult<R::View> {
    let id = parse_id(&id, R::TITLE)?;
    let view = membership::remove_member::<R>(&state.store, id, member.parse().ok(), &user).await?;
    Ok(ApiResponse::success(view))
}
