//! HTTP error responses for web adapter.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::domain::error::ViewerError;

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

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

pub fn status_from_error(err: &ViewerError) -> StatusCode {
    match err {
        ViewerError::Remote { .. } | ViewerError::RemoteResponse { .. } => StatusCode::BAD_GATEWAY,
        ViewerError::ConfigParse { .. }
        | ViewerError::ConfigMissing { .. }
        | ViewerError::ConfigInvalid { .. }
        | ViewerError::Session { .. }
        | ViewerError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<ViewerError> for WebError {
    fn from(err: ViewerError) -> Self {
        tracing::error!("request failed: {err}");
        Self::new(status_from_error(&err), err.to_string())
    }
}

impl From<askama::Error> for WebError {
    fn from(err: askama::Error) -> Self {
        tracing::error!("template rendering failed: {err}");
        Self::internal("template rendering failed")
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let template = super::templates::ErrorTemplate {
            message: &self.message,
            status: self.status.as_u16(),
        };
        match template.render() {
            Ok(html) => (self.status, Html(html)).into_response(),
            Err(_) => (self.status, self.message).into_response(),
        }
    }
}
