// handlers/public/auth/login.rs - POST /api/auth/login handler

use axum::extract::State;

use crate::handlers::utils::JsonBody;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::accounts::{self, LoginInput, Session};
use crate::state::AppState;

/// POST /api/auth/login - exchange `{email, password}` for a bearer token
///
/// Unknown email and wrong password produce the same 401 so accounts can't be probed.
pub async fn login_post(State(state): State<AppState>, JsonBody(input): JsonBody<LoginInput>) -> ApiResult<Session> {
    let session = accounts::login(&state.store, &state.jwt, input).await?;
    Ok(ApiResponse::success(session))
}
