// handlers/protected/posts.rs - feed, likes and comments
//
// Create/update/delete of posts themselves go through resource.rs.

use axum::extract::{Extension, Path, Query, State};
use serde::Deserialize;

use crate::database::models::{Document, Post, PostView};
use crate::handlers::utils::{lenient_number, parse_id, JsonBody};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::posts::{self, PageRequest, PostPage};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub tag: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommentBody {
    pub text: Option<String>,
}

/// GET /api/posts?page&limit&tag - newest first, paginated
pub async fn list(State(state): State<AppState>, Query(query): Query<FeedQuery>) -> ApiResult<PostPage> {
    let page = PageRequest::clamp(
        lenient_number(query.page.as_deref()),
        lenient_number(query.limit.as_deref()),
        &state.config.pagination,
    );
    Ok(ApiResponse::success(posts::list_page(&state.store, query.tag, page).await?))
}

/// PUT /api/posts/:id/like
pub async fn like(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<PostView> {
    let id = parse_id(&id, Post::TITLE)?;
    Ok(ApiResponse::success(posts::toggle_like(&state.store, id, &user).await?))
}

/// POST /api/posts/:id/comments
pub async fn comment_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<CommentBody>,
) -> ApiResult<PostView> {
    let id = parse_id(&id, Post::TITLE)?;
    let view = posts::add_comment(&state.store, id, body.text, &user).await?;
    Ok(ApiResponse::success(view))
}

/// PUT /api/posts/:id/comments/:commentId - author only
pub async fn comment_put(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((id, comment_id)): Path<(String, String)>,
    JsonBody(body): JsonBody<CommentBody>,
) -> ApiResult<PostView> {
    let id = parse_id(&id, Post::TITLE)?;
    let comment_id = parse_id(&comment_id, "Comment")?;
    let view = posts::edit_comment(&state.store, id, comment_id, body.text, &user).await?;
    Ok(ApiResponse::success(view))
}

/// DELETE /api/posts/:id/comments/:commentId - comment author or post owner
pub async fn comment_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((id, comment_id)): Path<(String, String)>,
) -> ApiResult<PostView> {
    let id = parse_id(&id, Post::TITLE)?;
    let comment_id = parse_id(&comment_id, "Comment")?;
    let view = posts::delete_comment(&state.store, id, comment_id, &user).await?;
    Ok(ApiResponse::success(view))
}
