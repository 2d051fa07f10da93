//! Authentication error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::jwt::JwtError;

/// Why a request failed authentication or authorization.
///
/// Every authentication failure renders as the same 401 response. The kinds
/// stay distinct for logging and tests.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing authorization header")]
    MissingCredential,
    #[error("invalid token")]
    InvalidToken,
    #[error("token expired")]
    Expired,
    #[error("invalid api key")]
    InvalidApiKey,
    #[error("forbidden")]
    Forbidden,
    #[error("internal error")]
    Internal,
}

impl From<JwtError> for AuthError {
    fn from(e: JwtError) -> Self {
        match e {
            JwtError::Expired => AuthError::Expired,
            JwtError::InvalidToken => AuthError::InvalidToken,
            JwtError::Encoding(_) | JwtError::TimeError => AuthError::Internal,
        }
    }
}

impl AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingCredential
            | AuthError::InvalidToken
            | AuthError::Expired
            | AuthError::InvalidApiKey => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            AuthError::MissingCredential
            | AuthError::InvalidToken
            | AuthError::Expired
            | AuthError::InvalidApiKey => "unauthorized",
            AuthError::Forbidden => "forbidden",
            AuthError::Internal => "Internal server error",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: &'static str,
        }

        tracing::debug!(reason = %self, "Request rejected by auth");

        (
            self.status_code(),
            Json(ErrorResponse {
                error: self.message(),
            }),
        )
            .into_response()
    }
}
