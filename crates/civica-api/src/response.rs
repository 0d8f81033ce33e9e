use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

/// Page metadata attached under `meta.pagination` on list responses.
#[derive(Debug, Clone, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            (total + per_page - 1) / per_page
        };
        Self {
            page,
            per_page,
            total,
            total_pages,
        }
    }
}

/// Uniform success envelope: `{ success, message, data }`.
pub fn ok<T: Serialize>(message: &str, data: T) -> Json<Value> {
    Json(json!({
        "success": true,
        "message": message,
        "data": data,
    }))
}

pub fn ok_paginated<T: Serialize>(message: &str, data: T, pagination: Pagination) -> Json<Value> {
    Json(json!({
        "success": true,
        "message": message,
        "data": data,
        "meta": { "pagination": pagination },
    }))
}
