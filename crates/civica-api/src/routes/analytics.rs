use axum::{
    extract::{Path, State},
    Json,
};
use civica_core::AppState;
use serde_json::Value;

use crate::error::ApiError;
use crate::response::ok;

pub async fn overview(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let overview = civica_core::analytics::overview(&state.db).await?;
    Ok(ok("Analytics overview", overview))
}

pub async fn category_breakdown(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let breakdown = civica_core::analytics::category_breakdown(&state.db).await?;
    Ok(ok("Category breakdown", breakdown))
}

pub async fn district_breakdown(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let breakdown = civica_core::analytics::district_breakdown(&state.db).await?;
    Ok(ok("District breakdown", breakdown))
}

pub async fn politician_comparison(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let comparison = civica_core::analytics::politician_comparison(&state.db, id).await?;
    Ok(ok("Politician comparison", comparison))
}

pub async fn party_comparison(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let comparison = civica_core::analytics::party_comparison(&state.db).await?;
    Ok(ok("Party comparison", comparison))
}
