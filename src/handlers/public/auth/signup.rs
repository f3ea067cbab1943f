// handlers/public/auth/signup.rs - POST /api/auth/signup handler

use axum::extract::State;

use crate::handlers::utils::JsonBody;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::accounts::{self, Session, SignupInput};
use crate::state::AppState;

/// POST /api/auth/signup - register with `{name, email, password}`
///
/// Responds 201 with the new account and a bearer token. A taken email is 409.
pub async fn signup_post(State(state): State<AppState>, JsonBody(input): JsonBody<SignupInput>) -> ApiResult<Session> {
    let session = accounts::signup(&state.store, &state.jwt, input).await?;
    Ok(ApiResponse::created(session))
}
