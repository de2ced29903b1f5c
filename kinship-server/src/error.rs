//! Error handling for the Kinship server

use std::error::Error as _;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kinship::{ErrorClass, KinshipError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Server error types
#[derive(Debug, Error)]
pub enum ServerError {
    /// Kinship library error
    #[error(transparent)]
    Kinship(#[from] KinshipError),

    /// Request could not be decoded
    #[error("{0}")]
    BadRequest(String),

    /// Request body exceeds the configured limit
    #[error("{0}")]
    PayloadTooLarge(String),

    /// Failure inside the server itself
    #[error("{0}")]
    Internal(String),
}

impl ServerError {
    /// Error class shared with the core library
    pub fn class(&self) -> ErrorClass {
        match self {
            ServerError::Kinship(err) => err.class(),
            ServerError::BadRequest(_) | ServerError::PayloadTooLarge(_) => ErrorClass::BadRequest,
            ServerError::Internal(_) => ErrorClass::Internal,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        if let ServerError::PayloadTooLarge(_) = self {
            return StatusCode::PAYLOAD_TOO_LARGE;
        }

        match self.class() {
            ErrorClass::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorClass::BadRequest => StatusCode::BAD_REQUEST,
            ErrorClass::NotFoundOrForbidden => StatusCode::NOT_FOUND,
            ErrorClass::Conflict => StatusCode::CONFLICT,
            ErrorClass::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error type string
    pub fn error_type(&self) -> &'static str {
        self.class().as_str()
    }

    /// Full `source()` chain, outermost first
    fn source_chain(&self) -> String {
        let mut chain = Vec::new();
        let mut current = self.source();
        while let Some(err) = current {
            chain.push(err.to_string());
            current = err.source();
        }
        chain.join(": ")
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, source = %self.source_chain(), "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let error_response = ErrorResponse {
            error: self.error_type().to_string(),
            message: self.to_string(),
        };

        (status, Json(error_response)).into_response()
    }
}

/// Result type for server operations
pub type ServerResult<T> = Result<T, ServerError>;

/// Helper function to create a bad request error
pub fn bad_request(message: impl Into<String>) -> ServerError {
    ServerError::BadRequest(message.into())
}
