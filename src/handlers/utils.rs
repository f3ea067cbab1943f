use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::types::RecordId;

/// `Json<T>` whose rejections render as the API's error body
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    ApiError::invalid_json(rejection.body_text())
}

/// A path id that isn't a UUID can't name a stored record, so it is a plain 404
pub fn parse_id(raw: &str, title: &str) -> Result<RecordId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::not_found(format!("{} not found", title)))
}

/// Query numbers are parsed leniently: anything unparsable counts as absent
pub fn lenient_number(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_maps_garbage_to_not_found() {
        let err = parse_id("not-a-uuid", "Post").unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "Post not found");
    }

    #[test]
    fn lenient_number_ignores_junk() {
        assert_eq!(lenient_number(Some("3")), Some(3));
        assert_eq!(lenient_number(Some(" 7 ")), Some(7));
        assert_eq!(lenient_number(Some("abc")), None);
        assert_eq!(lenient_number(Some("-1")), None);
        assert_eq!(lenient_number(None), None);
    }
}
