// handlers/protected/resource.rs - POST /api/{kind}, PUT/DELETE /api/{kind}/:id
//
// Instantiated once per entity in routes.rs, e.g. `post(resource::create::<Project>)`.

use axum::extract::{Extension, Path, State};

use crate::handlers::utils::{parse_id, JsonBody};
use crate::middleware::{ApiResponse, ApiResult, AuthUser, Deleted};
use crate::services::{resource, Resource};
use crate::state::AppState;

/// POST /api/{kind} - 201 with the stored record, owned by the caller
pub async fn create<R: Resource>(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    JsonBody(input): JsonBody<R::Input>,
) -> ApiResult<R::View> {
    let view = resource::create::<R>(&state.store, input, &user).await?;
    Ok(ApiResponse::created(view))
}

/// PUT /api/{kind}/:id - owner-only merge update
pub async fn update<R: Resource>(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<R::Input>,
) -> ApiResult<R::View> {
    let id = parse_id(&id, R::TITLE)?;
    let view = resource::update::<R>(&state.store, id, input, &user).await?;
    Ok(ApiResponse::success(view))
}

/// DELETE /api/{kind}/:id - owner-only
pub async fn delete<R: Resource>(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Deleted> {
    let id = parse_id(&id, R::TITLE)?;
    let deleted = resource::delete::<R>(&state.store, id, &user).await?;
    Ok(ApiResponse::success(deleted))
}
