pub mod error;
pub mod middleware;
pub mod response;
pub mod routes;

use axum::{
    routing::{get, post},
    Router,
};
use civica_core::AppState;

pub fn build_router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/polls",
            post(routes::polls::create_poll).get(routes::polls::list_polls),
        )
        .route(
            "/api/v1/polls/{id}",
            get(routes::polls::get_poll)
                .patch(routes::polls::update_poll)
                .delete(routes::polls::delete_poll),
        )
        .route("/api/v1/polls/{id}/options", post(routes::polls::add_option))
        .route("/api/v1/polls/{id}/vote", post(routes::polls::cast_vote))
        .route("/api/v1/analytics/overview", get(routes::analytics::overview))
        .route(
            "/api/v1/analytics/categories",
            get(routes::analytics::category_breakdown),
        )
        .route(
            "/api/v1/analytics/districts",
            get(routes::analytics::district_breakdown),
        )
        .route(
            "/api/v1/analytics/politicians/{id}",
            get(routes::analytics::politician_comparison),
        )
        .route(
            "/api/v1/analytics/parties",
            get(routes::analytics::party_comparison),
        )
        .route(
            "/api/v1/politicians",
            post(routes::politicians::create_politician).get(routes::politicians::list_politicians),
        )
        .route(
            "/api/v1/politicians/{id}",
            get(routes::politicians::get_politician),
        )
        .route(
            "/api/v1/politicians/{id}/rating",
            post(routes::politicians::rate_politician),
        )
}
