// handlers/public/auth/oauth.rs - GET /api/auth/{provider} and /api/auth/{provider}/callback

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::{info, warn};
use url::Url;

use crate::auth::OAuthProvider;
use crate::error::ApiError;
use crate::services::accounts;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Set by the provider when the user declines
    pub error: Option<String>,
}

pub async fn google_start(State(state): State<AppState>) -> Result<Redirect, ApiError> {
    start(&state, OAuthProvider::Google)
}

pub async fn github_start(State(state): State<AppState>) -> Result<Redirect, ApiError> {
    start(&state, OAuthProvider::Github)
}

pub async fn google_callback(State(state): State<AppState>, Query(query): Query<CallbackQuery>) -> Response {
    callback(&state, OAuthProvider::Google, query).await
}

pub async fn github_callback(State(state): State<AppState>, Query(query): Query<CallbackQuery>) -> Response {
    callback(&state, OAuthProvider::Github, query).await
}

/// Redirect to the provider's consent screen with a signed, short-lived state
fn start(state: &AppState, provider: OAuthProvider) -> Result<Redirect, ApiError> {
    let nonce = state.jwt.issue_state(provider)?;
    let url = state.oauth.authorize_url(provider, &nonce)?;
    Ok(Redirect::to(url.as_str()))
}

/// Finish the dance and hand the browser back to the client app.
///
/// Success lands on `{client}/auth/callback?token=...`; any failure on
/// `{client}/login?error={provider}_auth_failed`. A provider that isn't configured is 503.
async fn callback(state: &AppState, provider: OAuthProvider, query: CallbackQuery) -> Response {
    if !state.oauth.is_enabled(provider) {
        return ApiError::from(crate::auth::AuthError::ProviderDisabled(provider.title())).into_response();
    }

    let client = &state.config.security.client_url;
    match complete(state, provider, query).await {
        Ok(token) => Redirect::to(&client_redirect(client, "/auth/callback", "token", &token)).into_response(),
        Err(e) => {
            warn!("{} login failed: {}", provider.title(), e.message());
            let reason = format!("{}_auth_failed", provider.slug());
            Redirect::to(&client_redirect(client, "/login", "error", &reason)).into_response()
        }
    }
}

async fn complete(state: &AppState, provider: OAuthProvider, query: CallbackQuery) -> Result<String, ApiError> {
    if let Some(error) = query.error {
        return Err(ApiError::unauthorized(format!("provider returned {}", error)));
    }
    let nonce = query.state.ok_or_else(|| ApiError::unauthorized("missing state"))?;
    state.jwt.verify_state(&nonce, provider)?;
    let code = query
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::bad_request("missing authorization code"))?;

    let profile = state.oauth.exchange(provider, &code).await?;
    let user = accounts::provision_oauth(&state.store, provider, profile).await?;
    info!("{} login for user {}", provider.title(), user.meta.id);
    Ok(state.jwt.issue(user.meta.id, &user.email)?)
}

/// `{base}{path}?{key}={value}`, percent-encoded when the base parses as a URL
pub fn client_redirect(base: &str, path: &str, key: &str, value: &str) -> String {
    match Url::parse(&format!("{}{}", base.trim_end_matches('/'), path)) {
        Ok(mut url) => {
            url.query_pairs_mut().append_pair(key, value);
            url.into()
        }
        Err(_) => format!("{}{}?{}={}", base.trim_end_matches('/'), path, key, value),
    }
}
