/*
 * Responsibility
 * - 永続化層の公開インターフェース
 * - handler からは PostStore trait だけが見える (実装は差し替え可能)
 */
pub mod error;
#[cfg(test)]
pub mod memory;
pub mod post_repo;

pub use error::{RepoError, RepoResult};
pub use post_repo::{NewPost, PgPostStore, PostPage, PostPatch, PostQuery, PostRow, PostStore};
