/*
 * Responsibility
 * - /posts 系 handler (create / list / update / soft delete)
 * - validation は store を触る前に返す
 * - store の失敗は AppError 側で log → 500
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::{
        dto::posts::{
            CreatePostRequest, CreatePostResponse, ListPostsQuery, ListPostsResponse,
            MessageResponse, UpdatePostRequest, UpdatePostResponse,
        },
        extractors::{JsonBody, PostId},
    },
    error::AppError,
    repos::PostQuery,
    state::AppState,
};

pub async fn create_post(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreatePostRequest>,
) -> Result<(StatusCode, Json<CreatePostResponse>), AppError> {
    let new = req.validate().map_err(AppError::validation)?;

    let row = state.posts.create(new).await?;
    tracing::info!(post_id = %row.id, "post created");

    Ok((
        StatusCode::CREATED,
        Json(CreatePostResponse {
            message: "Created successfully!",
            post: row.into(),
        }),
    ))
}

pub async fn list_posts(
    State(state): State<AppState>,
    query: ListPostsQuery,
) -> Result<Json<ListPostsResponse>, AppError> {
    let page = state
        .posts
        .list(PostQuery {
            search: query.search(),
            limit: query.limit(),
            offset: query.offset(),
        })
        .await?;

    Ok(Json(ListPostsResponse {
        posts: page.posts.into_iter().map(Into::into).collect(),
        total: page.total,
    }))
}

pub async fn update_post(
    State(state): State<AppState>,
    PostId(id): PostId,
    JsonBody(req): JsonBody<UpdatePostRequest>,
) -> Result<Json<UpdatePostResponse>, AppError> {
    let patch = req.validate().map_err(AppError::validation)?;

    let row = state
        .posts
        .update(id, patch)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(UpdatePostResponse {
        message: "Post updated successfully",
        post: row.into(),
    }))
}

pub async fn delete_post(
    State(state): State<AppState>,
    PostId(id): PostId,
) -> Result<Json<MessageResponse>, AppError> {
    let post = state.posts.get(id).await?.ok_or(AppError::NotFound)?;

    // 2 回目以降の delete は何もせず成功を返す
    if post.deleted_at.is_none() {
        if !state.posts.soft_delete(id).await? {
            return Err(AppError::NotFound);
        }
        tracing::info!(post_id = %id, "post soft-deleted");
    }

    Ok(Json(MessageResponse {
        message: "Successfully deleted",
    }))
}
