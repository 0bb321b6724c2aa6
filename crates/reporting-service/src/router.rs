//! Axum router wiring.
//!
//! Report API plus the operational endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use crate::{app_state::AppState, handlers::reports, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(reports::SUMMARY_ROUTE, get(reports::summary))
        .route(reports::UPDATE_ROUTE, post(reports::update))
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .route("/metrics", get(ops::metrics))
        .with_state(state)
}
