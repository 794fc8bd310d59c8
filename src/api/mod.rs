// REST endpoints for the bookmarking service

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::HeaderMap,
    routing::{get, patch, post, put},
};
use serde_json::{Value, json};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::Authenticator;
use crate::bookmarks::BookmarkService;
use crate::db::Db;
use crate::error::ApiError;
use crate::types::BookmarkId;

/// Shared state handed to every handler.
///
/// Both components hold a clone of the same database handle, which is
/// internally synchronized; no request-level locking is needed.
#[derive(Clone)]
pub struct AppState {
    pub auth: Authenticator,
    pub bookmarks: BookmarkService,
}

impl AppState {
    pub fn new(db: Db) -> Self {
        Self {
            auth: Authenticator::new(db.clone()),
            bookmarks: BookmarkService::new(db),
        }
    }
}

pub fn create_router(db: Db) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/auth/{username}", post(login))
        .route("/token", put(rotate_token))
        .route("/user/{username}", post(register))
        .route("/bookmarks", get(list_bookmarks))
        .route("/bookmarks/tag/{tag}", get(list_bookmarks_by_tag))
        .route("/bookmark", post(create_bookmark))
        .route("/bookmark/{id}", patch(update_bookmark).delete(delete_bookmark))
        .fallback(route_not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(AppState::new(db))
}

/// Parse a request body as JSON, tolerating an absent or malformed body.
///
/// Field validation downstream decides what is actually required, so a
/// garbage body fails with the same payload error as a missing field
/// instead of a framework-shaped rejection.
fn parse_body(body: &Bytes) -> Value {
    serde_json::from_slice(body).unwrap_or(Value::Null)
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}

async fn login(
    State(state): State<AppState>,
    Path(username): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let token = state.auth.login(&username, &parse_body(&body)).await?;
    Ok(Json(json!({ "token": token })))
}

async fn register(
    State(state): State<AppState>,
    Path(username): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let token = state.auth.register(&username, &parse_body(&body)).await?;
    Ok(Json(json!({ "token": token })))
}

async fn rotate_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user = state.auth.authorize(&headers).await?;
    let token = state.auth.rotate(&user).await?;
    Ok(Json(json!({ "token": token })))
}

async fn list_bookmarks(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user = state.auth.authorize(&headers).await?;
    let bookmarks = state.bookmarks.list(&user).await?;
    Ok(Json(json!({ "bookmarks": bookmarks })))
}

async fn list_bookmarks_by_tag(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(tag): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let user = state.auth.authorize(&headers).await?;
    let bookmarks = state.bookmarks.list_by_tag(&user, &tag).await?;
    Ok(Json(json!({ "bookmarks": bookmarks })))
}

async fn create_bookmark(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let user = state.auth.authorize(&headers).await?;
    let id = state.bookmarks.create(&user, &parse_body(&body)).await?;
    Ok(Json(json!({ "id": id })))
}

async fn update_bookmark(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let user = state.auth.authorize(&headers).await?;
    let id = BookmarkId::new(id);
    state.bookmarks.update(&user, &id, &parse_body(&body)).await?;
    Ok(Json(json!({ "id": id })))
}

async fn delete_bookmark(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let user = state.auth.authorize(&headers).await?;
    let id = BookmarkId::new(id);
    state.bookmarks.delete(&user, &id).await?;
    Ok(Json(json!({ "id": id })))
}
