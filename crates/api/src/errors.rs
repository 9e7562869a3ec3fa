use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use hookd_domain::DomainError;
use serde_json::json;

pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            DomainError::HookNotFound => (StatusCode::NOT_FOUND, self.0.to_string()),
            DomainError::AuthFailure => (StatusCode::UNAUTHORIZED, self.0.to_string()),
            DomainError::BadRequest => (StatusCode::BAD_REQUEST, self.0.to_string()),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
