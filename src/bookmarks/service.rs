//! Bookmark orchestration: validation, id generation, tag-replace semantics.

use serde::Serialize;
use serde_json::Value;

use crate::auth::credentials;
use crate::bookmarks::store::BookmarkStore;
use crate::bookmarks::tags::TagIndex;
use crate::db::Db;
use crate::error::ApiError;
use crate::types::{BookmarkId, UserId};

/// A bookmark as returned to clients: the stored row plus its tag set.
#[derive(Debug, Clone, Serialize)]
pub struct BookmarkWithTags {
    pub id: BookmarkId,
    pub url: String,
    pub title: String,
    pub tags: Vec<String>,
}

#[derive(Clone)]
pub struct BookmarkService {
    store: BookmarkStore,
    tags: TagIndex,
}

impl BookmarkService {
    pub fn new(db: Db) -> Self {
        Self {
            store: BookmarkStore::new(db.clone()),
            tags: TagIndex::new(db),
        }
    }

    /// Create a bookmark from a raw payload and return its new id.
    ///
    /// The payload must carry string `url` and `title` and an array of
    /// strings under `tags` (an empty array is fine, a missing or non-array
    /// field is not).
    pub async fn create(&self, owner: &UserId, payload: &Value) -> Result<BookmarkId, ApiError> {
        let (url, title) = required_fields(payload)?;
        let tags = payload
            .get("tags")
            .map(tag_strings)
            .transpose()?
            .ok_or(ApiError::InvalidPayload("bookmark details are invalid"))?;

        let id = BookmarkId::new(credentials::new_opaque_id()?);
        self.store.insert(&id, owner, url, title).await?;

        for tag in &tags {
            self.tags.insert(tag, owner, &id).await?;
        }

        Ok(id)
    }

    /// All of an owner's bookmarks, each with its tags attached.
    pub async fn list(&self, owner: &UserId) -> Result<Vec<BookmarkWithTags>, ApiError> {
        let rows = self.store.list_by_owner(owner).await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let tags = self.tags.tags_for(owner, &row.id).await?;
            out.push(BookmarkWithTags {
                id: row.id,
                url: row.url,
                title: row.title,
                tags,
            });
        }
        Ok(out)
    }

    /// The owner's bookmarks carrying a given tag.
    ///
    /// Candidate ids come from the unscoped tag index and may belong to
    /// other users; the owner-filtered fetch drops those entirely, so
    /// another owner's bookmark can never appear in the result.
    pub async fn list_by_tag(
        &self,
        owner: &UserId,
        tag: &str,
    ) -> Result<Vec<BookmarkWithTags>, ApiError> {
        let candidates = self.tags.bookmarks_for_tag(tag).await?;

        let mut out = Vec::new();
        for id in candidates {
            let Some(row) = self.store.find_by_id_and_owner(&id, owner).await? else {
                continue;
            };
            let tags = self.tags.tags_for(owner, &row.id).await?;
            out.push(BookmarkWithTags {
                id: row.id,
                url: row.url,
                title: row.title,
                tags,
            });
        }
        Ok(out)
    }

    /// Update url/title and, when the payload carries a `tags` array,
    /// replace the entire tag set (an empty array clears it).
    ///
    /// An unknown id or an owner mismatch is a silent no-op in every part:
    /// callers cannot distinguish "updated" from "nothing to update", and
    /// no tag rows are written for a bookmark the owner does not hold.
    /// A `tags` field that is absent or not an array leaves tags untouched.
    pub async fn update(
        &self,
        owner: &UserId,
        id: &BookmarkId,
        payload: &Value,
    ) -> Result<(), ApiError> {
        let (url, title) = required_fields(payload)?;
        let replacement = match payload.get("tags") {
            Some(value) if value.is_array() => Some(tag_strings(value)?),
            _ => None,
        };

        let owned = self.store.find_by_id_and_owner(id, owner).await?.is_some();
        self.store.update(id, owner, url, title).await?;

        if owned {
            if let Some(tags) = replacement {
                self.tags.delete_all(owner, id).await?;
                for tag in &tags {
                    self.tags.insert(tag, owner, id).await?;
                }
            }
        }

        Ok(())
    }

    /// Delete a bookmark and all of its tag rows; idempotent.
    pub async fn delete(&self, owner: &UserId, id: &BookmarkId) -> Result<(), ApiError> {
        self.store.delete(id, owner).await?;
        self.tags.delete_all(owner, id).await?;
        Ok(())
    }
}

/// Pull the mandatory string `url` and `title` out of a payload.
fn required_fields(payload: &Value) -> Result<(&str, &str), ApiError> {
    let url = payload
        .get("url")
        .and_then(Value::as_str)
        .ok_or(ApiError::InvalidPayload("bookmark details are invalid"))?;
    let title = payload
        .get("title")
        .and_then(Value::as_str)
        .ok_or(ApiError::InvalidPayload("bookmark details are invalid"))?;
    Ok((url, title))
}

/// Interpret a payload value as an array of tag strings.
fn tag_strings(value: &Value) -> Result<Vec<String>, ApiError> {
    let items = value
        .as_array()
        .ok_or(ApiError::InvalidPayload("bookmark details are invalid"))?;

    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or(ApiError::InvalidPayload("bookmark details are invalid"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{DatabaseConfig, create_connection, ensure_schema};
    use serde_json::json;
    use std::collections::HashSet;

    async fn setup_service() -> BookmarkService {
        let config = DatabaseConfig {
            url: "memory".to_string(),
            ..Default::default()
        };
        let db = create_connection(config).await.unwrap();
        ensure_schema(&db).await.unwrap();
        BookmarkService::new(db)
    }

    fn owner(name: &str) -> UserId {
        UserId::new(name.to_string())
    }

    fn tag_set(entry: &BookmarkWithTags) -> HashSet<String> {
        entry.tags.iter().cloned().collect()
    }

    #[tokio::test]
    async fn test_create_then_list_roundtrip() {
        let service = setup_service().await;
        let alice = owner("alice-id");

        let id = service
            .create(
                &alice,
                &json!({ "url": "https://example.com", "title": "Example", "tags": ["a", "b"] }),
            )
            .await
            .unwrap();

        let listed = service.list(&alice).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, id);
        assert_eq!(listed[0].url, "https://example.com");
        assert_eq!(listed[0].title, "Example");
        // Tag order is not guaranteed; compare as a set.
        assert_eq!(
            tag_set(&listed[0]),
            HashSet::from(["a".to_string(), "b".to_string()])
        );
    }

    #[tokio::test]
    async fn test_create_with_empty_tags() {
        let service = setup_service().await;
        let alice = owner("alice-id");

        service
            .create(&alice, &json!({ "url": "u", "title": "t", "tags": [] }))
            .await
            .unwrap();

        let listed = service.list(&alice).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert!(listed[0].tags.is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_bad_payloads() {
        let service = setup_service().await;
        let alice = owner("alice-id");

        let bad_payloads = [
            json!({ "title": "t", "tags": [] }),                      // url missing
            json!({ "url": 1, "title": "t", "tags": [] }),            // url not a string
            json!({ "url": "u", "tags": [] }),                        // title missing
            json!({ "url": "u", "title": "t" }),                      // tags missing
            json!({ "url": "u", "title": "t", "tags": "a" }),         // tags not an array
            json!({ "url": "u", "title": "t", "tags": ["a", 2] }),    // non-string tag
        ];

        for payload in bad_payloads {
            let err = service.create(&alice, &payload).await.unwrap_err();
            assert!(matches!(err, ApiError::InvalidPayload(_)), "{payload}");
        }

        assert!(service.list(&alice).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_by_tag_filters_and_attaches_tags() {
        let service = setup_service().await;
        let alice = owner("alice-id");

        let tagged = service
            .create(&alice, &json!({ "url": "u1", "title": "t1", "tags": ["rust", "web"] }))
            .await
            .unwrap();
        service
            .create(&alice, &json!({ "url": "u2", "title": "t2", "tags": ["web"] }))
            .await
            .unwrap();

        let hits = service.list_by_tag(&alice, "rust").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, tagged);
        assert_eq!(
            tag_set(&hits[0]),
            HashSet::from(["rust".to_string(), "web".to_string()])
        );

        assert!(service.list_by_tag(&alice, "absent").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_by_tag_never_leaks_other_owners() {
        let service = setup_service().await;
        let alice = owner("alice-id");
        let bob = owner("bob-id");

        service
            .create(&bob, &json!({ "url": "secret", "title": "Bob's", "tags": ["shared"] }))
            .await
            .unwrap();
        let own = service
            .create(&alice, &json!({ "url": "mine", "title": "Alice's", "tags": ["shared"] }))
            .await
            .unwrap();

        // The unscoped index sees both; the result contains only Alice's.
        let hits = service.list_by_tag(&alice, "shared").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, own);
        assert_eq!(hits[0].url, "mine");
    }

    #[tokio::test]
    async fn test_update_replaces_then_preserves_tags() {
        let service = setup_service().await;
        let alice = owner("alice-id");

        let id = service
            .create(&alice, &json!({ "url": "u", "title": "t", "tags": ["a", "b"] }))
            .await
            .unwrap();

        // Empty array clears the whole set.
        service
            .update(&alice, &id, &json!({ "url": "u2", "title": "t2", "tags": [] }))
            .await
            .unwrap();
        let listed = service.list(&alice).await.unwrap();
        assert_eq!(listed[0].url, "u2");
        assert!(listed[0].tags.is_empty());

        // A new set fully replaces.
        service
            .update(&alice, &id, &json!({ "url": "u2", "title": "t2", "tags": ["c"] }))
            .await
            .unwrap();
        let listed = service.list(&alice).await.unwrap();
        assert_eq!(listed[0].tags, vec!["c"]);

        // Omitted tags leave the prior set untouched.
        service
            .update(&alice, &id, &json!({ "url": "u3", "title": "t3" }))
            .await
            .unwrap();
        let listed = service.list(&alice).await.unwrap();
        assert_eq!(listed[0].url, "u3");
        assert_eq!(listed[0].tags, vec!["c"]);

        // A non-array tags field is ignored the same way.
        service
            .update(&alice, &id, &json!({ "url": "u4", "title": "t4", "tags": "x" }))
            .await
            .unwrap();
        let listed = service.list(&alice).await.unwrap();
        assert_eq!(listed[0].url, "u4");
        assert_eq!(listed[0].tags, vec!["c"]);
    }

    #[tokio::test]
    async fn test_update_requires_url_and_title() {
        let service = setup_service().await;
        let alice = owner("alice-id");

        let id = service
            .create(&alice, &json!({ "url": "u", "title": "t", "tags": [] }))
            .await
            .unwrap();

        let err = service
            .update(&alice, &id, &json!({ "url": "u2" }))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidPayload(_)));

        // Nothing changed.
        let listed = service.list(&alice).await.unwrap();
        assert_eq!(listed[0].url, "u");
    }

    #[tokio::test]
    async fn test_update_cross_owner_is_noop() {
        let service = setup_service().await;
        let alice = owner("alice-id");
        let bob = owner("bob-id");

        let id = service
            .create(&alice, &json!({ "url": "u", "title": "t", "tags": ["a"] }))
            .await
            .unwrap();

        service
            .update(&bob, &id, &json!({ "url": "stolen", "title": "x", "tags": ["evil"] }))
            .await
            .unwrap();

        // Alice's bookmark and tags are untouched, and Bob gained nothing.
        let listed = service.list(&alice).await.unwrap();
        assert_eq!(listed[0].url, "u");
        assert_eq!(listed[0].tags, vec!["a"]);
        assert!(service.list(&bob).await.unwrap().is_empty());
        assert!(service.list_by_tag(&bob, "evil").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_bookmark_and_tags() {
        let service = setup_service().await;
        let alice = owner("alice-id");

        let id = service
            .create(&alice, &json!({ "url": "u", "title": "t", "tags": ["a"] }))
            .await
            .unwrap();

        service.delete(&alice, &id).await.unwrap();

        assert!(service.list(&alice).await.unwrap().is_empty());
        assert!(service.list_by_tag(&alice, "a").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let service = setup_service().await;
        let alice = owner("alice-id");

        let id = service
            .create(&alice, &json!({ "url": "u", "title": "t", "tags": [] }))
            .await
            .unwrap();

        service.delete(&alice, &id).await.unwrap();
        service.delete(&alice, &id).await.unwrap();
        service
            .delete(&alice, &BookmarkId::new("never-existed"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_delete_cross_owner_leaves_target_alone() {
        let service = setup_service().await;
        let alice = owner("alice-id");
        let bob = owner("bob-id");

        let id = service
            .create(&alice, &json!({ "url": "u", "title": "t", "tags": ["a"] }))
            .await
            .unwrap();

        service.delete(&bob, &id).await.unwrap();

        let listed = service.list(&alice).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].tags, vec!["a"]);
    }
}
