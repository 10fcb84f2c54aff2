//! Relay error type and its mapping onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("AOAI not configured")]
    NotConfigured,

    #[error("Invalid JSON body: {0}")]
    InvalidBody(#[source] serde_json::Error),

    #[error("Invalid JSON body: expected an object or array")]
    UnexpectedBodyShape,

    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::NotConfigured
            | RelayError::InvalidBody(_)
            | RelayError::UnexpectedBodyShape => StatusCode::BAD_REQUEST,
            RelayError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
