//! Request error taxonomy and its mapping onto HTTP responses.
//!
//! Every fallible path in the service funnels into [`ApiError`]. The
//! variants cover exactly the user-facing failures; anything coming out of
//! the store is folded into the internal variants and rendered with a
//! generic message so persistence details never leak to clients.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// A required field is missing or has the wrong type.
    #[error("{0}")]
    InvalidPayload(&'static str),
    /// Registration under a name that already exists.
    #[error("user with given username exists")]
    DuplicateUser,
    /// Unknown username or failed password verification.
    #[error("password is incorrect")]
    IncorrectCredential,
    /// No `Authorization` header on a protected route.
    #[error("token not present")]
    MissingToken,
    /// A token was presented but matches no user.
    #[error("token is invalid")]
    InvalidToken,
    /// No route matched the request.
    #[error("route cannot be found")]
    RouteNotFound,
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
    #[error("internal server error")]
    Database(#[from] surrealdb::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidPayload(_)
            | ApiError::DuplicateUser
            | ApiError::IncorrectCredential => StatusCode::BAD_REQUEST,
            ApiError::MissingToken | ApiError::InvalidToken => StatusCode::UNAUTHORIZED,
            ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) | ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Internal(err) => tracing::error!("request failed: {err:#}"),
            ApiError::Database(err) => tracing::error!("store failure: {err}"),
            _ => {}
        }
        (self.status(), Json(json!({ "message": self.to_string() }))).into_response()
    }
}
