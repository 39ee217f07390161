/*
 * Responsibility
 * - copi_posts の CRUD (create / get / list / update / soft delete)
 * - 物理削除はしない: deleted_at が立っている行は list から除外するだけ
 * - PostStore trait で handler から実装 (Postgres / in-memory) を隠す
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::repos::error::RepoResult;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PostRow {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: String,
}

/// Partial update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PostQuery {
    /// Case-insensitive substring of the title. Empty means no filter.
    pub search: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Clone)]
pub struct PostPage {
    pub posts: Vec<PostRow>,
    /// Filtered count before limit/offset are applied.
    pub total: i64,
}

#[async_trait]
pub trait PostStore: Send + Sync {
    async fn create(&self, new: NewPost) -> RepoResult<PostRow>;

    /// Fetch by id regardless of soft-delete state.
    async fn get(&self, id: Uuid) -> RepoResult<Option<PostRow>>;

    /// Active posts only, newest first.
    async fn list(&self, query: PostQuery) -> RepoResult<PostPage>;

    /// Returns `None` when the id is unknown or the post is soft-deleted.
    async fn update(&self, id: Uuid, patch: PostPatch) -> RepoResult<Option<PostRow>>;

    /// Returns `false` only when the id is unknown. Deleting twice keeps the first timestamp.
    async fn soft_delete(&self, id: Uuid) -> RepoResult<bool>;

    /// Whether the table holds any row at all, soft-deleted ones included.
    async fn has_any(&self) -> RepoResult<bool>;
}

/// Escape LIKE wildcards so the search term is matched literally.
pub(crate) fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn search_pattern(search: Option<&str>) -> Option<String> {
    search
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{}%", escape_like(s)))
}

#[derive(Clone, Debug)]
pub struct PgPostStore {
    pool: PgPool,
}

impl PgPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// timestamp は DB 側の clock_timestamp() で打つ (順に作った post が同じ時刻にならないように)
#[async_trait]
impl PostStore for PgPostStore {
    async fn create(&self, new: NewPost) -> RepoResult<PostRow> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO copi_posts (id, title, content, created_at)
            VALUES ($1, $2, $3, clock_timestamp())
            RETURNING
                id, title, content, created_at, updated_at, deleted_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.title)
        .bind(&new.content)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn get(&self, id: Uuid) -> RepoResult<Option<PostRow>> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT
                id, title, content, created_at, updated_at, deleted_at
            FROM copi_posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list(&self, query: PostQuery) -> RepoResult<PostPage> {
        let pattern = search_pattern(query.search.as_deref());

        // count と page を同じ snapshot から読む
        let mut tx = self.pool.begin().await?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM copi_posts
            WHERE deleted_at IS NULL
                AND ($1::text IS NULL OR title ILIKE $1 ESCAPE '\')
            "#,
        )
        .bind(pattern.as_deref())
        .fetch_one(&mut *tx)
        .await?;

        let posts = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT
                id, title, content, created_at, updated_at, deleted_at
            FROM copi_posts
            WHERE deleted_at IS NULL
                AND ($1::text IS NULL OR title ILIKE $1 ESCAPE '\')
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(pattern.as_deref())
        .bind(query.limit)
        .bind(query.offset)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(PostPage { posts, total })
    }

    async fn update(&self, id: Uuid, patch: PostPatch) -> RepoResult<Option<PostRow>> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            UPDATE copi_posts
            SET
                title = COALESCE($2, title),
                content = COALESCE($3, content),
                updated_at = clock_timestamp()
            WHERE id = $1
                AND deleted_at IS NULL
            RETURNING
                id, title, content, created_at, updated_at, deleted_at
            "#,
        )
        .bind(id)
        .bind(patch.title.as_deref())
        .bind(patch.content.as_deref())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn soft_delete(&self, id: Uuid) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE copi_posts
            SET deleted_at = COALESCE(deleted_at, clock_timestamp())
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn has_any(&self) -> RepoResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM copi_posts)")
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }
}
