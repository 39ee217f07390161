/*
 * Responsibility
 * - Path の String を受けて Uuid に変換する
 * - UUID として読めない id は「存在しない post」と同じ扱い (404)
 */
use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostId(pub Uuid);

impl<S> FromRequestParts<S> for PostId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::NotFound)?;

        Uuid::parse_str(raw.trim())
            .map(PostId)
            .map_err(|_| AppError::NotFound)
    }
}
