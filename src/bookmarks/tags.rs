//! Tag associations between bookmarks and their owners.
//!
//! A tag row is a relation, not an entity: it carries no externally visible
//! identity and is only ever written and removed in bulk for an
//! (owner, bookmark) pair. The index performs no referential validation;
//! the service guarantees the pair references a live bookmark at insert.

use crate::db::Db;
use crate::error::ApiError;
use crate::types::{BookmarkId, UserId};

#[derive(Clone)]
pub struct TagIndex {
    db: Db,
}

impl TagIndex {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Associate a tag with a bookmark under its owner.
    pub async fn insert(
        &self,
        tag: &str,
        owner: &UserId,
        bookmark: &BookmarkId,
    ) -> Result<(), ApiError> {
        self.db
            .query(
                r#"
                CREATE tag SET
                    tag = $tag,
                    owner = $owner,
                    bookmark = $bookmark
                RETURN NONE
                "#,
            )
            .bind(("tag", tag.to_string()))
            .bind(("owner", owner.as_str().to_string()))
            .bind(("bookmark", bookmark.as_str().to_string()))
            .await?
            .check()?;

        Ok(())
    }

    /// All tag strings attached to one bookmark of one owner.
    pub async fn tags_for(
        &self,
        owner: &UserId,
        bookmark: &BookmarkId,
    ) -> Result<Vec<String>, ApiError> {
        let mut res = self
            .db
            .query("SELECT VALUE tag FROM tag WHERE owner = $owner AND bookmark = $bookmark")
            .bind(("owner", owner.as_str().to_string()))
            .bind(("bookmark", bookmark.as_str().to_string()))
            .await?;

        let tags: Vec<String> = res.take(0)?;
        Ok(tags)
    }

    /// Bookmark ids carrying a tag, across ALL owners.
    ///
    /// Deliberately unscoped: owner filtering happens downstream when the
    /// ids are joined against the bookmark store.
    pub async fn bookmarks_for_tag(&self, tag: &str) -> Result<Vec<BookmarkId>, ApiError> {
        let mut res = self
            .db
            .query("SELECT VALUE bookmark FROM tag WHERE tag = $tag")
            .bind(("tag", tag.to_string()))
            .await?;

        let ids: Vec<BookmarkId> = res.take(0)?;
        Ok(ids)
    }

    /// Remove every tag row for an (owner, bookmark) pair.
    pub async fn delete_all(&self, owner: &UserId, bookmark: &BookmarkId) -> Result<(), ApiError> {
        self.db
            .query("DELETE tag WHERE owner = $owner AND bookmark = $bookmark")
            .bind(("owner", owner.as_str().to_string()))
            .bind(("bookmark", bookmark.as_str().to_string()))
            .await?
            .check()?;

        Ok(())
    }
}
