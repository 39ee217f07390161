/*
 * Responsibility
 * - GET /posts の query string を ListPostsQuery に変換する
 * - 重複 key は最初の値を採用し、読めない query は既定値扱い (400 にはしない)
 */
use std::convert::Infallible;

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;

use crate::api::dto::posts::ListPostsQuery;

impl<S> FromRequestParts<S> for ListPostsQuery
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let pairs = match Query::<Vec<(String, String)>>::try_from_uri(&parts.uri) {
            Ok(Query(pairs)) => pairs,
            Err(e) => {
                tracing::debug!(error = %e, "unreadable query string, using defaults");
                Vec::new()
            }
        };

        Ok(ListPostsQuery::from_pairs(pairs))
    }
}
