/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 * - store は起動時に注入する (global にしない)
 * - Clone 前提で持つ (内部は Arc)
 */
use std::sync::Arc;

use crate::repos::PostStore;

#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostStore>,
}

impl AppState {
    pub fn new(posts: Arc<dyn PostStore>) -> Self {
        Self { posts }
    }
}
