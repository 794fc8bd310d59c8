//! Bearer-token authorization and the account flows built on it.

use axum::http::HeaderMap;
use serde_json::Value;

use crate::auth::credentials;
use crate::auth::user_store::UserStore;
use crate::db::Db;
use crate::error::ApiError;
use crate::types::{BearerToken, UserId};

/// The single authorization checkpoint.
///
/// Every protected operation starts by calling [`Authenticator::authorize`];
/// beyond it there is no per-resource ACL, only owner-equality filtering in
/// the stores.
#[derive(Clone)]
pub struct Authenticator {
    users: UserStore,
}

impl Authenticator {
    pub fn new(db: Db) -> Self {
        Self {
            users: UserStore::new(db),
        }
    }

    /// Get reference to the user store.
    pub fn users(&self) -> &UserStore {
        &self.users
    }

    /// Resolve the caller's identity from the request headers.
    ///
    /// A missing `Authorization` header is [`ApiError::MissingToken`]; a
    /// present token that matches no user is [`ApiError::InvalidToken`].
    /// The `"Bearer "` prefix is expected but not required: without it the
    /// raw header value is looked up as-is.
    pub async fn authorize(&self, headers: &HeaderMap) -> Result<UserId, ApiError> {
        let header = headers
            .get(http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::MissingToken)?;

        let token = header.strip_prefix("Bearer ").unwrap_or(header);

        self.users
            .find_by_token(token)
            .await?
            .ok_or(ApiError::InvalidToken)
    }

    /// Exchange a username and password for the user's current token.
    ///
    /// An unknown username and a wrong password are indistinguishable to the
    /// caller, so login does not reveal whether an account exists.
    pub async fn login(&self, username: &str, payload: &Value) -> Result<BearerToken, ApiError> {
        let password = payload
            .get("password")
            .and_then(Value::as_str)
            .ok_or(ApiError::InvalidPayload("password is invalid"))?;

        let creds = self
            .users
            .find_by_name(username)
            .await?
            .ok_or(ApiError::IncorrectCredential)?;

        if !credentials::verify_password(&creds.password, password) {
            return Err(ApiError::IncorrectCredential);
        }

        Ok(creds.token)
    }

    /// Register a new account under the given username and return its first
    /// bearer token.
    pub async fn register(&self, username: &str, payload: &Value) -> Result<BearerToken, ApiError> {
        let password = payload
            .get("password")
            .and_then(Value::as_str)
            .ok_or(ApiError::InvalidPayload("password is invalid"))?;

        let hash = credentials::hash_password(password)?;
        let token = credentials::new_token()?;

        self.users.create_user(username, &hash, &token).await?;
        Ok(token)
    }

    /// Mint and persist a fresh token for an already-authorized user.
    pub async fn rotate(&self, user: &UserId) -> Result<BearerToken, ApiError> {
        let token = credentials::new_token()?;
        self.users.rotate_token(user, &token).await?;
        Ok(token)
    }
}
