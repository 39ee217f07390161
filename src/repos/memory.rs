//! In-memory `PostStore` used by the handler tests.
//!
//! Mirrors the Postgres semantics: soft-deleted rows stay fetchable by id,
//! `list` hides them, and repeated deletes keep the first timestamp.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::repos::error::RepoResult;
use crate::repos::post_repo::{NewPost, PostPage, PostPatch, PostQuery, PostRow, PostStore};

struct Entry {
    // Insertion order breaks created_at ties.
    seq: u64,
    row: PostRow,
}

#[derive(Default)]
struct Inner {
    next_seq: u64,
    rows: HashMap<Uuid, Entry>,
}

// Postgres の timestamptz と同じ microsecond 精度に揃える
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

#[derive(Default)]
pub struct InMemoryPostStore {
    inner: RwLock<Inner>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn create(&self, new: NewPost) -> RepoResult<PostRow> {
        let mut inner = self.inner.write().await;

        let row = PostRow {
            id: Uuid::new_v4(),
            title: new.title,
            content: new.content,
            created_at: now(),
            updated_at: None,
            deleted_at: None,
        };

        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.rows.insert(
            row.id,
            Entry {
                seq,
                row: row.clone(),
            },
        );

        Ok(row)
    }

    async fn get(&self, id: Uuid) -> RepoResult<Option<PostRow>> {
        let inner = self.inner.read().await;
        Ok(inner.rows.get(&id).map(|e| e.row.clone()))
    }

    async fn list(&self, query: PostQuery) -> RepoResult<PostPage> {
        let inner = self.inner.read().await;

        let needle = query
            .search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let mut matched: Vec<&Entry> = inner
            .rows
            .values()
            .filter(|e| e.row.deleted_at.is_none())
            .filter(|e| match &needle {
                Some(n) => e.row.title.to_lowercase().contains(n.as_str()),
                None => true,
            })
            .collect();

        matched.sort_by(|a, b| {
            b.row
                .created_at
                .cmp(&a.row.created_at)
                .then(b.seq.cmp(&a.seq))
        });

        let total = matched.len() as i64;
        let posts = matched
            .into_iter()
            .skip(query.offset.max(0) as usize)
            .take(query.limit.max(0) as usize)
            .map(|e| e.row.clone())
            .collect();

        Ok(PostPage { posts, total })
    }

    async fn update(&self, id: Uuid, patch: PostPatch) -> RepoResult<Option<PostRow>> {
        let mut inner = self.inner.write().await;

        let Some(entry) = inner.rows.get_mut(&id) else {
            return Ok(None);
        };
        if entry.row.deleted_at.is_some() {
            return Ok(None);
        }

        let current = &entry.row;
        let next = PostRow {
            title: patch.title.unwrap_or_else(|| current.title.clone()),
            content: patch.content.unwrap_or_else(|| current.content.clone()),
            updated_at: Some(now()),
            ..current.clone()
        };
        entry.row = next.clone();

        Ok(Some(next))
    }

    async fn soft_delete(&self, id: Uuid) -> RepoResult<bool> {
        let mut inner = self.inner.write().await;

        match inner.rows.get_mut(&id) {
            Some(entry) => {
                entry.row.deleted_at.get_or_insert_with(now);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn has_any(&self) -> RepoResult<bool> {
        Ok(!self.inner.read().await.rows.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_post(title: &str, content: &str) -> NewPost {
        NewPost {
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    fn query(search: Option<&str>, limit: i64, offset: i64) -> PostQuery {
        PostQuery {
            search: search.map(str::to_string),
            limit,
            offset,
        }
    }

    #[tokio::test]
    async fn create_then_get_returns_same_post() {
        let store = InMemoryPostStore::new();
        let created = store.create(new_post("Tea", "hot")).await.unwrap();

        let fetched = store.get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "Tea");
        assert_eq!(fetched.content, "hot");
        assert_eq!(fetched.created_at, created.created_at);
        assert!(fetched.updated_at.is_none());
        assert!(fetched.deleted_at.is_none());
    }

    #[tokio::test]
    async fn list_is_newest_first_and_paginated() {
        let store = InMemoryPostStore::new();
        store.create(new_post("A", "a")).await.unwrap();
        store.create(new_post("B", "b")).await.unwrap();
        store.create(new_post("C", "c")).await.unwrap();

        let page = store.list(query(None, 1, 1)).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.posts.len(), 1);
        assert_eq!(page.posts[0].title, "B");

        let page = store.list(query(None, 10, 0)).await.unwrap();
        let titles: Vec<_> = page.posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["C", "B", "A"]);
    }

    #[tokio::test]
    async fn list_search_is_case_insensitive_and_total_ignores_window() {
        let store = InMemoryPostStore::new();
        store.create(new_post("Coffee beans", "x")).await.unwrap();
        store.create(new_post("Tea", "x")).await.unwrap();
        store.create(new_post("iced COFFEE", "x")).await.unwrap();

        let page = store.list(query(Some("coffee"), 1, 0)).await.unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.posts.len(), 1);
        assert_eq!(page.posts[0].title, "iced COFFEE");
    }

    #[tokio::test]
    async fn soft_deleted_posts_are_hidden_but_fetchable() {
        let store = InMemoryPostStore::new();
        let post = store.create(new_post("Tea", "hot")).await.unwrap();

        assert!(store.soft_delete(post.id).await.unwrap());

        let page = store.list(query(None, 10, 0)).await.unwrap();
        assert_eq!(page.total, 0);
        assert!(page.posts.is_empty());

        let fetched = store.get(post.id).await.unwrap().unwrap();
        assert!(fetched.deleted_at.is_some());
    }

    #[tokio::test]
    async fn repeated_soft_delete_keeps_first_timestamp() {
        let store = InMemoryPostStore::new();
        let post = store.create(new_post("Tea", "hot")).await.unwrap();

        store.soft_delete(post.id).await.unwrap();
        let first = store.get(post.id).await.unwrap().unwrap().deleted_at;

        assert!(store.soft_delete(post.id).await.unwrap());
        let second = store.get(post.id).await.unwrap().unwrap().deleted_at;

        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn soft_delete_unknown_id_reports_missing() {
        let store = InMemoryPostStore::new();
        assert!(!store.soft_delete(Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn update_applies_only_given_fields() {
        let store = InMemoryPostStore::new();
        let post = store.create(new_post("Tea", "hot")).await.unwrap();

        let patch = PostPatch {
            title: None,
            content: Some("iced".to_string()),
        };
        let updated = store.update(post.id, patch).await.unwrap().unwrap();

        assert_eq!(updated.id, post.id);
        assert_eq!(updated.title, "Tea");
        assert_eq!(updated.content, "iced");
        assert_eq!(updated.created_at, post.created_at);
        assert!(updated.updated_at.is_some());
    }

    #[tokio::test]
    async fn update_refuses_soft_deleted_post() {
        let store = InMemoryPostStore::new();
        let post = store.create(new_post("Tea", "hot")).await.unwrap();
        store.soft_delete(post.id).await.unwrap();

        let patch = PostPatch {
            title: Some("Coffee".to_string()),
            content: None,
        };
        assert!(store.update(post.id, patch).await.unwrap().is_none());
        assert_eq!(store.get(post.id).await.unwrap().unwrap().title, "Tea");
    }

    #[tokio::test]
    async fn timestamps_have_microsecond_precision() {
        let store = InMemoryPostStore::new();
        let post = store.create(new_post("Tea", "hot")).await.unwrap();

        assert_eq!(post.created_at.timestamp_subsec_nanos() % 1_000, 0);
    }

    #[tokio::test]
    async fn has_any_counts_deleted_rows() {
        let store = InMemoryPostStore::new();
        assert!(!store.has_any().await.unwrap());

        let post = store.create(new_post("Tea", "hot")).await.unwrap();
        store.soft_delete(post.id).await.unwrap();
        assert!(store.has_any().await.unwrap());
    }
}
