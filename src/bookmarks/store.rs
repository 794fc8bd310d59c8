//! Durable bookmark records.

use crate::db::Db;
use crate::db::schema::BookmarkRecord;
use crate::error::ApiError;
use crate::types::{BookmarkId, UserId};

/// Bookmark store for database operations.
///
/// Every query here filters by owner; there is no way to reach another
/// user's rows through this type.
#[derive(Clone)]
pub struct BookmarkStore {
    db: Db,
}

impl BookmarkStore {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Insert a bookmark under the given owner.
    pub async fn insert(
        &self,
        id: &BookmarkId,
        owner: &UserId,
        url: &str,
        title: &str,
    ) -> Result<(), ApiError> {
        self.db
            .query(
                r#"
                CREATE type::thing('bookmark', $id) SET
                    owner = $owner,
                    url = $url,
                    title = $title
                RETURN NONE
                "#,
            )
            .bind(("id", id.as_str().to_string()))
            .bind(("owner", owner.as_str().to_string()))
            .bind(("url", url.to_string()))
            .bind(("title", title.to_string()))
            .await?
            .check()?;

        Ok(())
    }

    /// All bookmarks belonging to an owner, in store order.
    pub async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<BookmarkRecord>, ApiError> {
        let mut res = self
            .db
            .query("SELECT record::id(id) AS id, url, title FROM bookmark WHERE owner = $owner")
            .bind(("owner", owner.as_str().to_string()))
            .await?;

        let rows: Vec<BookmarkRecord> = res.take(0)?;
        Ok(rows)
    }

    /// Fetch one bookmark, but only if it belongs to the owner.
    pub async fn find_by_id_and_owner(
        &self,
        id: &BookmarkId,
        owner: &UserId,
    ) -> Result<Option<BookmarkRecord>, ApiError> {
        let mut res = self
            .db
            .query(
                r#"
                SELECT record::id(id) AS id, url, title
                FROM type::thing('bookmark', $id)
                WHERE owner = $owner
                "#,
            )
            .bind(("id", id.as_str().to_string()))
            .bind(("owner", owner.as_str().to_string()))
            .await?;

        let row: Option<BookmarkRecord> = res.take(0)?;
        Ok(row)
    }

    /// Update url and title on the (id, owner) row.
    ///
    /// A missing row or an owner mismatch is a silent no-op, not an error.
    pub async fn update(
        &self,
        id: &BookmarkId,
        owner: &UserId,
        url: &str,
        title: &str,
    ) -> Result<(), ApiError> {
        self.db
            .query(
                r#"
                UPDATE type::thing('bookmark', $id) SET
                    url = $url,
                    title = $title
                WHERE owner = $owner
                RETURN NONE
                "#,
            )
            .bind(("id", id.as_str().to_string()))
            .bind(("owner", owner.as_str().to_string()))
            .bind(("url", url.to_string()))
            .bind(("title", title.to_string()))
            .await?
            .check()?;

        Ok(())
    }

    /// Delete the (id, owner) row; no-op if absent.
    pub async fn delete(&self, id: &BookmarkId, owner: &UserId) -> Result<(), ApiError> {
        self.db
            .query("DELETE type::thing('bookmark', $id) WHERE owner = $owner")
            .bind(("id", id.as_str().to_string()))
            .bind(("owner", owner.as_str().to_string()))
            .await?
            .check()?;

        Ok(())
    }
}
