use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not found")]
    NotFound,
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Storage failures are logged server-side and kept opaque on the wire.
        let (message, errors) = match &self {
            ApiError::Internal(err) => {
                tracing::error!("API internal error: {err:#}");
                ("internal server error".to_string(), Value::Null)
            }
            ApiError::BadRequest(detail) => {
                ("validation failed".to_string(), json!([detail]))
            }
            other => (other.to_string(), Value::Null),
        };

        let body = json!({
            "success": false,
            "message": message,
            "errors": errors,
        });

        (status, Json(body)).into_response()
    }
}

impl From<civica_core::error::CoreError> for ApiError {
    fn from(e: civica_core::error::CoreError) -> Self {
        use civica_core::error::CoreError;
        match e {
            CoreError::NotFound => ApiError::NotFound,
            CoreError::Validation(msg) => ApiError::BadRequest(msg),
            CoreError::Conflict(msg) => ApiError::Conflict(msg),
            CoreError::Database(err) => ApiError::Internal(anyhow::anyhow!(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use civica_core::error::CoreError;

    #[test]
    fn status_codes_follow_the_error_taxonomy() {
        assert_eq!(ApiError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Unauthorized.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::BadRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn core_errors_map_to_the_right_variants() {
        assert!(matches!(
            ApiError::from(CoreError::NotFound),
            ApiError::NotFound
        ));
        assert!(matches!(
            ApiError::from(CoreError::Validation("v".into())),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            ApiError::from(CoreError::Conflict("c".into())),
            ApiError::Conflict(_)
        ));
    }

    #[test]
    fn validation_failure_responds_with_400() {
        let response = ApiError::BadRequest("too few options".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
