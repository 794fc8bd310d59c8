//! Durable user records: creation, credential lookup, token rotation.

use serde::Deserialize;

use crate::auth::credentials;
use crate::db::Db;
use crate::db::schema::StoredCredentials;
use crate::error::ApiError;
use crate::types::{BearerToken, UserId};

/// User store for database operations.
#[derive(Clone)]
pub struct UserStore {
    db: Db,
}

impl UserStore {
    /// Create a new user store.
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Create a user and return its freshly minted id.
    ///
    /// Fails with [`ApiError::DuplicateUser`] when the name is taken. The
    /// check runs before the insert; the unique index on `name` backstops
    /// the race between two concurrent registrations, turning the losing
    /// insert into a store error.
    pub async fn create_user(
        &self,
        name: &str,
        password_hash: &str,
        token: &BearerToken,
    ) -> Result<UserId, ApiError> {
        if self.find_by_name(name).await?.is_some() {
            return Err(ApiError::DuplicateUser);
        }

        let id = UserId::new(credentials::new_opaque_id()?);

        self.db
            .query(
                r#"
                CREATE type::thing('user', $id) SET
                    name = $name,
                    password = $password,
                    token = $tok
                RETURN NONE
                "#,
            )
            .bind(("id", id.as_str().to_string()))
            .bind(("name", name.to_string()))
            .bind(("password", password_hash.to_string()))
            .bind(("tok", token.as_str().to_string()))
            .await?
            .check()?;

        Ok(id)
    }

    /// Look up the stored credentials for a username.
    ///
    /// Absence is `None`, never an error: callers decide how much to reveal.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<StoredCredentials>, ApiError> {
        let mut res = self
            .db
            .query("SELECT password, token FROM user WHERE name = $name LIMIT 1")
            .bind(("name", name.to_string()))
            .await?;

        let creds: Option<StoredCredentials> = res.take(0)?;
        Ok(creds)
    }

    /// Resolve a bearer token to the user id it belongs to.
    pub async fn find_by_token(&self, token: &str) -> Result<Option<UserId>, ApiError> {
        #[derive(Deserialize)]
        struct IdRow {
            id: UserId,
        }

        let mut res = self
            .db
            .query("SELECT record::id(id) AS id FROM user WHERE token = $tok LIMIT 1")
            .bind(("tok", token.to_string()))
            .await?;

        let row: Option<IdRow> = res.take(0)?;
        Ok(row.map(|r| r.id))
    }

    /// Replace a user's bearer token. The previous token stops matching
    /// immediately.
    pub async fn rotate_token(&self, id: &UserId, token: &BearerToken) -> Result<(), ApiError> {
        self.db
            .query("UPDATE type::thing('user', $id) SET token = $tok RETURN NONE")
            .bind(("id", id.as_str().to_string()))
            .bind(("tok", token.as_str().to_string()))
            .await?
            .check()?;

        Ok(())
    }
}
