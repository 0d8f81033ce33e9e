use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use civica_core::AppState;

use crate::error::ApiError;

/// Any authenticated identity. The token is minted by the external auth
/// service; this server only validates the signature and expiry.
pub struct AuthUser {
    pub user_id: i64,
    pub role: String,
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())?
        .strip_prefix("Bearer ")
}

fn validate_auth(parts: &Parts, state: &AppState) -> Result<civica_core::auth::Claims, ApiError> {
    let token = bearer_token(parts).ok_or(ApiError::Unauthorized)?;
    civica_core::auth::validate_token(token, &state.config.jwt_secret)
        .map_err(|_| ApiError::Unauthorized)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = validate_auth(parts, state)?;
        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}

/// Extractor that requires the authenticated user to hold the admin role.
pub struct AdminUser {
    pub user_id: i64,
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = validate_auth(parts, state)?;
        if !claims.is_admin() {
            return Err(ApiError::Forbidden);
        }
        Ok(AdminUser {
            user_id: claims.sub,
        })
    }
}
