use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::RecordId;

/// Acting identity resolved from the bearer token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: RecordId,
    pub email: String,
    pub name: String,
}

/// Validates the bearer JWT, confirms the user still exists, and injects [`AuthUser`]
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(&headers).map_err(|msg| {
        warn!("Rejected request to {}: {}", request.uri().path(), msg);
        ApiError::unauthorized(msg)
    })?;

    let claims = state.jwt.verify(&token).map_err(|e| {
        warn!("Rejected request to {}: {}", request.uri().path(), e);
        ApiError::unauthorized("Not authorized, token failed")
    })?;

    let user = state
        .store
        .users
        .get(claims.id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("User not found"))?;

    request.extensions_mut().insert(AuthUser {
        id: user.meta.id,
        email: user.email,
        name: user.name,
    });

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, &'static str> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or("Missing Authorization header")?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if token.trim().is_empty() => Err("Empty JWT token"),
        Some(token) => Ok(token.trim().to_string()),
        None => Err("Authorization header must use Bearer token format"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(extract_jwt_from_headers(&headers("Bearer abc.def")).unwrap(), "abc.def");
    }

    #[test]
    fn rejects_missing_wrong_scheme_and_empty() {
        assert_eq!(
            extract_jwt_from_headers(&HeaderMap::new()).unwrap_err(),
            "Missing Authorization header"
        );
        assert_eq!(
            extract_jwt_from_headers(&headers("Basic abc")).unwrap_err(),
            "Authorization header must use Bearer token format"
        );
        assert_eq!(extract_jwt_from_headers(&headers("Bearer  ")).unwrap_err(), "Empty JWT token");
    }
}
