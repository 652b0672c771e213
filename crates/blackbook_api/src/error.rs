//! HTTP translation of failures.
//!
//! # Invariants
//! - Every failure body is `{"errors": [message, ...]}`.
//! - Internal details are logged, never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use blackbook_core::{BlackBookError, ErrorStatus};
use log::error;
use serde_json::json;
use std::fmt::{Display, Formatter};

pub const UNAUTHENTICATED_MESSAGE: &str = "You need to sign in or sign up before continuing.";

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    Domain(BlackBookError),
    /// Missing or unknown bearer token.
    Unauthenticated,
    /// Request body is not the expected JSON.
    MalformedBody(String),
    /// Path segment does not parse as an id.
    InvalidPath(String),
    /// Query string does not deserialize.
    InvalidQuery(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Domain(err) => match err.status() {
                ErrorStatus::BadRequest => StatusCode::BAD_REQUEST,
                ErrorStatus::Forbidden => StatusCode::FORBIDDEN,
                ErrorStatus::NotFound => StatusCode::NOT_FOUND,
                ErrorStatus::UnprocessableEntity => StatusCode::UNPROCESSABLE_ENTITY,
                ErrorStatus::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::MalformedBody(_) | Self::InvalidPath(_) | Self::InvalidQuery(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }

    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Domain(err) => err.messages(),
            Self::Unauthenticated => vec![UNAUTHENTICATED_MESSAGE.to_string()],
            Self::MalformedBody(detail) | Self::InvalidPath(detail) | Self::InvalidQuery(detail) => {
                vec![detail.clone()]
            }
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Domain(err) => write!(f, "{err}"),
            Self::Unauthenticated => write!(f, "{UNAUTHENTICATED_MESSAGE}"),
            Self::MalformedBody(detail) => write!(f, "malformed body: {detail}"),
            Self::InvalidPath(detail) => write!(f, "invalid path: {detail}"),
            Self::InvalidQuery(detail) => write!(f, "invalid query: {detail}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<BlackBookError> for ApiError {
    fn from(value: BlackBookError) -> Self {
        Self::Domain(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(
                "event=request_failed module=api status=error http_status={} detail={}",
                status.as_u16(),
                self
            );
        }
        (status, Json(json!({ "errors": self.messages() }))).into_response()
    }
}
