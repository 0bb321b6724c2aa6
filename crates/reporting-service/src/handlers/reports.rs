//! Report endpoints.
//!
//! - `GET  /reports/summary` : open/closed/total counts
//! - `POST /reports/update`  : apply one `{"event": ...}`
//!
//! Store availability is checked before anything else, so a service booted
//! without a store answers 503 whatever the request carries.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::Serialize;

use reporting_core::error::{ReportError, Result};
use reporting_core::protocol::{parse_update_body, TicketSummary, UpdateOutcome};

use crate::app_state::AppState;
use crate::error::ApiError;

pub const SUMMARY_ROUTE: &str = "/reports/summary";
pub const UPDATE_ROUTE: &str = "/reports/update";

pub async fn summary(State(state): State<AppState>) -> Response {
    let res = load_summary(&state).await;
    respond(&state, SUMMARY_ROUTE, res)
}

pub async fn update(State(state): State<AppState>, body: Bytes) -> Response {
    let res = apply_update(&state, &body).await;
    if let Err(e @ (ReportError::InvalidEvent | ReportError::MalformedBody(_))) = &res {
        state
            .metrics()
            .rejected_events
            .inc(&[("reason", e.client_code().as_str())]);
    }
    respond(&state, UPDATE_ROUTE, res)
}

async fn load_summary(state: &AppState) -> Result<TicketSummary> {
    state.reports()?.summary().await
}

async fn apply_update(state: &AppState, body: &[u8]) -> Result<UpdateOutcome> {
    let reports = state.reports()?;
    let event = parse_update_body(body)?;
    reports.apply(event).await
}

fn respond<T: Serialize>(state: &AppState, route: &'static str, res: Result<T>) -> Response {
    let resp = match res {
        Ok(body) => {
            tracing::debug!(%route, "request served");
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            match &e {
                ReportError::StoreUnavailable(reason) => {
                    tracing::warn!(%route, %reason, "store unavailable");
                }
                other => tracing::debug!(%route, error = %other, "request rejected"),
            }
            ApiError(e).into_response()
        }
    };
    state
        .metrics()
        .http_requests
        .inc(&[("route", route), ("status", resp.status().as_str())]);
    resp
}
