//! Comments nested under a blog.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use bloglist_core::models::Comment;
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CommentPayload {
    #[serde(default)]
    content: String,
}

pub async fn list_comments(
    State(state): State<AppState>,
    Path(blog_id): Path<String>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let store = state.store.read().await;
    let comments = store.comments_for(&blog_id)?.into_iter().cloned().collect();
    Ok(Json(comments))
}

pub async fn add_comment(
    State(state): State<AppState>,
    Path(blog_id): Path<String>,
    payload: Result<Json<CommentPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let Json(payload) = payload?;

    let comment = state
        .mutate(|store| Ok(store.add_comment(&blog_id, &payload.content)?))
        .await?;

    tracing::debug!(blog = %comment.blog, comment = %comment.id, "comment added");
    Ok((StatusCode::CREATED, Json(comment)))
}
