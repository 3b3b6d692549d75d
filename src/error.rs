use std::io;

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("Path is outside the workspace root")]
    OutOfBounds,

    #[error("Not found")]
    NotFound,

    #[error("Permission denied")]
    PermissionDenied,

    #[error("Not a directory")]
    NotADirectory,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BrowserError {
    /// Classify a filesystem error. Anything that is not an access problem
    /// counts as the target being absent.
    pub fn from_io(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => BrowserError::PermissionDenied,
            io::ErrorKind::NotADirectory => BrowserError::NotADirectory,
            _ => BrowserError::NotFound,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            BrowserError::OutOfBounds | BrowserError::PermissionDenied => StatusCode::FORBIDDEN,
            BrowserError::NotFound | BrowserError::NotADirectory => StatusCode::NOT_FOUND,
            BrowserError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<tokio::task::JoinError> for BrowserError {
    fn from(err: tokio::task::JoinError) -> Self {
        BrowserError::Internal(err.to_string())
    }
}

impl IntoResponse for BrowserError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let BrowserError::Internal(detail) = &self {
            error!("Request failed: {}", detail);
        }

        // Fixed body: never echo paths or OS error text back to the client
        let body = format!(
            "{} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Error")
        );

        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            body,
        )
            .into_response()
    }
}
