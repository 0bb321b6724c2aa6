//! HTTP mapping for `ReportError`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use reporting_core::error::{ClientCode, ReportError};
use reporting_core::protocol::ErrorBody;

/// Handler-boundary error: logged in full, rendered as `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError(pub ReportError);

impl From<ReportError> for ApiError {
    fn from(e: ReportError) -> Self {
        Self(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.client_code() {
            ClientCode::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ClientCode::InvalidEvent | ClientCode::BadRequest => StatusCode::BAD_REQUEST,
            ClientCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0.client_code();
        let body = Json(ErrorBody {
            error: code.public_message(),
        });
        (self.status(), body).into_response()
    }
}
