/*
 * Responsibility
 * - URL 構造を定義 (/health, /posts, /posts/{id})
 * - middleware は app.rs 側で Router 全体にかける
 */
use axum::{
    Router,
    routing::{get, patch},
};

use crate::api::handlers::{
    health::health,
    posts::{create_post, delete_post, list_posts, update_post},
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/{id}", patch(update_post).delete(delete_post))
}
