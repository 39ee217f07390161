/*
 * Responsibility
 * - axum::Json の rejection (content-type 不一致 / 壊れた JSON / 型不一致) を
 *   AppError::Validation に揃える
 */
use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            tracing::debug!(error = %e, "rejected request body");
            AppError::validation("Invalid JSON body")
        })?;

        Ok(Self(value))
    }
}
