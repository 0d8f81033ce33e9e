use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use civica_core::polls::{CreatePoll, OptionInput, UpdatePoll};
use civica_core::AppState;
use civica_db::polls::PollFilter;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::{AdminUser, AuthUser};
use crate::response::{ok, ok_paginated, Pagination};

const DEFAULT_PER_PAGE: i64 = 20;
const MAX_PER_PAGE: i64 = 100;

pub async fn create_poll(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(body): Json<CreatePoll>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let poll = civica_core::polls::create_poll(&state.db, body).await?;
    tracing::info!(poll_id = poll.id, admin = admin.user_id, "poll created via API");
    Ok((StatusCode::CREATED, ok("Poll created", poll)))
}

#[derive(Deserialize)]
pub struct ListPollsQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub district: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

pub async fn list_polls(
    State(state): State<AppState>,
    Query(query): Query<ListPollsQuery>,
) -> Result<Json<Value>, ApiError> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query
        .per_page
        .unwrap_or(DEFAULT_PER_PAGE)
        .clamp(1, MAX_PER_PAGE);

    let filter = PollFilter {
        search: query.search.filter(|s| !s.trim().is_empty()),
        category: query.category,
        status: query.status,
        district: query.district,
    };
    let result =
        civica_core::polls::list_polls(&state.db, &filter, per_page, (page - 1) * per_page)
            .await?;

    Ok(ok_paginated(
        "Polls retrieved",
        result.polls,
        Pagination::new(page, per_page, result.total),
    ))
}

pub async fn get_poll(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let (poll, stats) = civica_core::polls::get_poll(&state.db, id).await?;
    Ok(ok(
        "Poll retrieved",
        json!({ "poll": poll, "statistics": stats }),
    ))
}

pub async fn update_poll(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
    Json(body): Json<UpdatePoll>,
) -> Result<Json<Value>, ApiError> {
    let poll = civica_core::polls::update_poll(&state.db, id, body).await?;
    Ok(ok("Poll updated", poll))
}

pub async fn delete_poll(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    civica_core::polls::delete_poll(&state.db, id).await?;
    tracing::info!(poll_id = id, admin = admin.user_id, "poll deleted via API");
    Ok(ok("Poll deleted", Value::Null))
}

pub async fn add_option(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
    Json(body): Json<OptionInput>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let option = civica_core::polls::add_option(&state.db, id, body).await?;
    Ok((StatusCode::CREATED, ok("Option added", option)))
}

#[derive(Deserialize)]
pub struct CastVoteRequest {
    pub option_id: i64,
}

pub async fn cast_vote(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(body): Json<CastVoteRequest>,
) -> Result<Json<Value>, ApiError> {
    let outcome =
        civica_core::polls::cast_vote(&state.db, id, body.option_id, auth.user_id).await?;
    Ok(ok(
        "Vote recorded",
        json!({ "poll": outcome.poll, "statistics": outcome.stats }),
    ))
}
