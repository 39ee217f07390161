/*
 * Responsibility
 * - Posts の request/response DTO
 * - validate() は形式チェックのみ (store には触らない)
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repos::{NewPost, PostPatch, PostRow};

pub const DEFAULT_LIMIT: i64 = 3;
pub const MAX_LIMIT: i64 = 100;

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl CreatePostRequest {
    pub fn validate(self) -> Result<NewPost, &'static str> {
        if is_blank(self.title.as_deref()) || is_blank(self.content.as_deref()) {
            return Err("Title and content are required");
        }

        Ok(NewPost {
            title: self.title.unwrap_or_default(),
            content: self.content.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl UpdatePostRequest {
    pub fn validate(self) -> Result<PostPatch, &'static str> {
        if self.title.is_none() && self.content.is_none() {
            return Err("No data provided to update");
        }
        if let Some(title) = &self.title
            && title.trim().is_empty()
        {
            return Err("title cannot be empty");
        }
        if let Some(content) = &self.content
            && content.trim().is_empty()
        {
            return Err("content cannot be empty");
        }

        Ok(PostPatch {
            title: self.title,
            content: self.content,
        })
    }
}

/// `limit` / `offset` は文字列で受ける: 数値にならない値は既定値に落とす
#[derive(Debug, Default)]
pub struct ListPostsQuery {
    pub search: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl ListPostsQuery {
    /// Keeps the first value of each known key; repeats and unknown keys are ignored.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "search" => &mut query.search,
                "limit" => &mut query.limit,
                "offset" => &mut query.offset,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        query
    }

    pub fn search(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    pub fn limit(&self) -> i64 {
        parse_non_negative(self.limit.as_deref())
            .unwrap_or(DEFAULT_LIMIT)
            .min(MAX_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        parse_non_negative(self.offset.as_deref()).unwrap_or(0)
    }
}

fn parse_non_negative(value: Option<&str>) -> Option<i64> {
    value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|n| *n >= 0)
}

#[derive(Debug, Serialize)]
pub struct CreatedPost {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<PostRow> for CreatedPost {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatePostResponse {
    pub message: &'static str,
    pub post: CreatedPost,
}

#[derive(Debug, Serialize)]
pub struct PostSummary {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<PostRow> for PostSummary {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListPostsResponse {
    pub posts: Vec<PostSummary>,
    pub total: i64,
}

#[derive(Debug, Serialize)]
pub struct UpdatedPost {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<PostRow> for UpdatedPost {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UpdatePostResponse {
    pub message: &'static str,
    pub post: UpdatedPost,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
