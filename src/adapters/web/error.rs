//! HTTP error responses for the web adapter.

use axum::{
    Json,
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::domain::error::MandiError;

#[derive(Debug)]
pub struct WebError {
    pub status: StatusCode,
    pub message: String,
}

impl WebError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

pub fn status_from_error(err: &MandiError) -> StatusCode {
    match err {
        MandiError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
        MandiError::ConfigInvalid { .. }
        | MandiError::ConfigParse { .. }
        | MandiError::DatasetAccess { .. }
        | MandiError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<MandiError> for WebError {
    fn from(err: MandiError) -> Self {
        let status = status_from_error(&err);
        if status.is_server_error() {
            tracing::error!(error = %err, "request failed");
        }
        Self::new(status, err.to_string())
    }
}

impl From<QueryRejection> for WebError {
    fn from(rejection: QueryRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "detail": self.message });
        (self.status, Json(body)).into_response()
    }
}
