use serde::{Deserialize, Serialize};

use crate::types::{BearerToken, BookmarkId};

/// Credential projection of a user row, as needed for a login check.
///
/// Looked up by name; the stored password is a PHC-format argon2 hash, never
/// plaintext, and comparison happens through hash verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCredentials {
    /// PHC string for the user's password.
    pub password: String,
    /// The user's current bearer token.
    pub token: BearerToken,
}

/// Bookmark projection returned by the store.
///
/// The owner is deliberately absent: every query that produces this struct
/// already filtered by owner, and the owner is never echoed back to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookmarkRecord {
    /// Opaque record key of the bookmark.
    pub id: BookmarkId,
    pub url: String,
    pub title: String,
}
