//! Error responses for the HTTP boundary.
//!
//! Every failure is rendered as `{"error": "<message>"}` with a status code
//! chosen by [`AppError`]:
//!
//! - `BadRequest`: the body is not valid JSON or has the wrong shape (400).
//! - `Sort`: a sort worker failed; the whole batch is discarded (500).
//! - `Panicked`: the handler itself panicked (500).

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Sort(#[from] sortbench::Error),

    #[error("Internal error: {0}")]
    Panicked(String),
}

impl AppError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Sort(_) | Self::Panicked(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}
