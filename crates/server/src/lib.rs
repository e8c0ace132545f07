//! KAM Lead Tracking Server
//!
//! Exposes the lead, KAM, contact and performance engines over HTTP.

pub mod http;
pub mod metrics;
pub mod state;

pub use http::create_router;
pub use metrics::{init_metrics, record_error, record_request};
pub use state::AppState;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error(transparent)]
    Engine(#[from] kam_leads_core::Error),
}

impl ServerError {
    fn kind(&self) -> &'static str {
        match self {
            ServerError::Engine(err) => err.kind(),
        }
    }
}

impl From<&ServerError> for StatusCode {
    fn from(err: &ServerError) -> Self {
        match err {
            ServerError::Engine(err) if err.is_not_found() => StatusCode::NOT_FOUND,
            ServerError::Engine(kam_leads_core::Error::Validation(_)) => StatusCode::BAD_REQUEST,
            ServerError::Engine(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = StatusCode::from(&self);
        record_error(self.kind());

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, %status, "Request rejected");
        }

        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
