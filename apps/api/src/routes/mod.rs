pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::feed::handlers::handle_list_jobs;
use crate::session::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Aggregator (also the default remote feed)
        .route("/api/jobs", get(handle_list_jobs))
        // Profiles
        .route(
            "/api/v1/profiles/:identity",
            get(handlers::handle_get_profile)
                .put(handlers::handle_put_profile)
                .delete(handlers::handle_delete_profile),
        )
        // Swipe sessions
        .route("/api/v1/sessions/:identity", get(handlers::handle_view))
        .route(
            "/api/v1/sessions/:identity/start",
            post(handlers::handle_start),
        )
        .route(
            "/api/v1/sessions/:identity/decide",
            post(handlers::handle_decide),
        )
        .route(
            "/api/v1/sessions/:identity/apply",
            post(handlers::handle_apply),
        )
        .route(
            "/api/v1/sessions/:identity/reset",
            post(handlers::handle_reset),
        )
        .route(
            "/api/v1/sessions/:identity/report",
            get(handlers::handle_report),
        )
        .route(
            "/api/v1/sessions/:identity/report/text",
            get(handlers::handle_report_text),
        )
        .with_state(state)
}
