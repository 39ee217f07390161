/**
 * Responsibility
 * - repo が上位に伝える意味の定義
 * - not found は error ではなく Option / bool で返す
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error")]
    Db(#[from] sqlx::Error),
}

pub type RepoResult<T> = Result<T, RepoError>;
