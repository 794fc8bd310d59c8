use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use surrealdb::Surreal;
use surrealdb::engine::any::Any;
use surrealdb::opt::auth::Root;

pub type Db = Surreal<Any>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub namespace: String,
    pub database: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: env::var("MARQUE_DATABASE_URL").unwrap_or_else(|_| "memory".to_string()),
            namespace: env::var("MARQUE_NAMESPACE").unwrap_or_else(|_| "marque".to_string()),
            database: env::var("MARQUE_DATABASE").unwrap_or_else(|_| "bookmarks".to_string()),
            username: env::var("MARQUE_DB_USERNAME").ok(),
            password: env::var("MARQUE_DB_PASSWORD").ok(),
        }
    }
}

pub async fn create_connection(config: DatabaseConfig) -> Result<Db> {
    let db = surrealdb::engine::any::connect(config.url).await?;

    // Sign in if credentials are provided
    if let (Some(username), Some(password)) = (config.username, config.password) {
        db.signin(Root {
            username: &username,
            password: &password,
        })
        .await?;
    }

    // Use the specified namespace and database
    db.use_ns(config.namespace).use_db(config.database).await?;

    Ok(db)
}

pub async fn ensure_schema(db: &Db) -> Result<()> {
    // Define schema for each table
    let schema_queries = vec![
        // User accounts. The record key is a caller-generated opaque hex
        // string; `name` is unique across all users.
        "DEFINE TABLE user SCHEMAFULL;
         DEFINE FIELD name ON TABLE user TYPE string;
         DEFINE FIELD password ON TABLE user TYPE string;
         DEFINE FIELD token ON TABLE user TYPE string;
         DEFINE FIELD created_at ON TABLE user VALUE time::now();",
        // Bookmarks, each owned by exactly one user.
        "DEFINE TABLE bookmark SCHEMAFULL;
         DEFINE FIELD owner ON TABLE bookmark TYPE string;
         DEFINE FIELD url ON TABLE bookmark TYPE string;
         DEFINE FIELD title ON TABLE bookmark TYPE string;
         DEFINE FIELD created_at ON TABLE bookmark VALUE time::now();",
        // Tag associations. A plain relation: the row id is never exposed
        // or addressed, rows are only ever written and deleted in bulk for
        // an (owner, bookmark) pair.
        "DEFINE TABLE tag SCHEMAFULL;
         DEFINE FIELD tag ON TABLE tag TYPE string;
         DEFINE FIELD owner ON TABLE tag TYPE string;
         DEFINE FIELD bookmark ON TABLE tag TYPE string;",
        // Indexes for lookup paths
        "DEFINE INDEX user_name ON TABLE user COLUMNS name UNIQUE;
         DEFINE INDEX user_token ON TABLE user COLUMNS token;
         DEFINE INDEX bookmark_owner ON TABLE bookmark COLUMNS owner;
         DEFINE INDEX tag_owner_bookmark ON TABLE tag COLUMNS owner, bookmark;
         DEFINE INDEX tag_tag ON TABLE tag COLUMNS tag;",
    ];

    for query in schema_queries {
        db.query(query).await?;
    }

    Ok(())
}
