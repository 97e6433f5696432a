//! Application error types.
//!
//! Every failure at the HTTP boundary is an [`AppError`]. The body is always
//! plain text, `An unexpected error occurred: <detail>`. The status code comes
//! from a [`StatusMapping`] table: `Flat` (the default) answers 500 for
//! everything, `Differentiated` gives each error kind its own status.

use std::str::FromStr;

use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use barbella_core::adapter::AdapterError;
use barbella_core::completion::CompletionError;
use thiserror::Error;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed request body.
    #[error("{0}")]
    BadRequest(String),

    /// Missing or invalid configuration, e.g. no API key.
    #[error("{0}")]
    Config(String),

    /// The model provider failed or returned an error.
    #[error("{0}")]
    Upstream(String),

    /// The model provider did not answer in time.
    #[error("{0}")]
    Timeout(String),
}

/// Discriminant of [`AppError`], used as the key of the status table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    Config,
    Upstream,
    Timeout,
}

/// Error kind → HTTP status table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusMapping {
    /// Every error is a 500.
    #[default]
    Flat,
    /// 400 / 500 / 502 / 504 by error kind.
    Differentiated,
}

impl StatusMapping {
    pub fn status_for(self, kind: ErrorKind) -> StatusCode {
        match (self, kind) {
            (StatusMapping::Flat, _) => StatusCode::INTERNAL_SERVER_ERROR,
            (StatusMapping::Differentiated, ErrorKind::BadRequest) => StatusCode::BAD_REQUEST,
            (StatusMapping::Differentiated, ErrorKind::Config) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            (StatusMapping::Differentiated, ErrorKind::Upstream) => StatusCode::BAD_GATEWAY,
            (StatusMapping::Differentiated, ErrorKind::Timeout) => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl FromStr for StatusMapping {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flat" => Ok(StatusMapping::Flat),
            "differentiated" => Ok(StatusMapping::Differentiated),
            other => Err(format!(
                "unknown status mapping '{other}' (expected 'flat' or 'differentiated')"
            )),
        }
    }
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::BadRequest(_) => ErrorKind::BadRequest,
            AppError::Config(_) => ErrorKind::Config,
            AppError::Upstream(_) => ErrorKind::Upstream,
            AppError::Timeout(_) => ErrorKind::Timeout,
        }
    }

    /// Plain-text response body.
    pub fn body(&self) -> String {
        format!("An unexpected error occurred: {self}")
    }

    /// Builds the response using `mapping` for the status code.
    pub fn into_response_with(self, mapping: StatusMapping) -> Response {
        (mapping.status_for(self.kind()), self.body()).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.into_response_with(StatusMapping::default())
    }
}

impl From<AdapterError> for AppError {
    fn from(e: AdapterError) -> Self {
        match e {
            AdapterError::InvalidRequest(msg) => AppError::BadRequest(msg),
        }
    }
}

impl From<CompletionError> for AppError {
    fn from(e: CompletionError) -> Self {
        match e {
            CompletionError::Config(msg) => AppError::Config(msg),
            CompletionError::Upstream(msg) => AppError::Upstream(msg),
            timeout @ CompletionError::Timeout(_) => AppError::Timeout(timeout.to_string()),
        }
    }
}

impl From<BytesRejection> for AppError {
    fn from(e: BytesRejection) -> Self {
        AppError::BadRequest(e.body_text())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::BadRequest(format!("request body must be a JSON array of turns: {e}"))
    }
}
