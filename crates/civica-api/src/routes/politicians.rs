use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use civica_core::politicians::CreatePolitician;
use civica_core::AppState;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::middleware::{AdminUser, AuthUser};
use crate::response::ok;

pub async fn create_politician(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(body): Json<CreatePolitician>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let politician = civica_core::politicians::create_politician(&state.db, body).await?;
    Ok((StatusCode::CREATED, ok("Politician created", politician)))
}

pub async fn list_politicians(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let politicians = civica_core::politicians::list_politicians(&state.db).await?;
    Ok(ok("Politicians retrieved", politicians))
}

pub async fn get_politician(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let politician = civica_core::politicians::get_politician(&state.db, id).await?;
    Ok(ok("Politician retrieved", politician))
}

#[derive(Deserialize)]
pub struct RateRequest {
    pub score: i64,
}

pub async fn rate_politician(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(body): Json<RateRequest>,
) -> Result<Json<Value>, ApiError> {
    let politician =
        civica_core::politicians::rate_politician(&state.db, id, auth.user_id, body.score).await?;
    Ok(ok("Rating recorded", politician))
}
