//! Blog CRUD endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use bloglist_core::models::{Blog, BlogDraft};
use bloglist_data::store::BlogStore;
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating or replacing a blog.
#[derive(Debug, Deserialize)]
pub struct BlogPayload {
    title: Option<String>,
    author: Option<String>,
    url: Option<String>,
    likes: Option<u64>,
}

impl BlogPayload {
    /// Title and url are required; likes default to 0.
    fn into_draft(self) -> Result<BlogDraft, ApiError> {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        if !present(&self.title) || !present(&self.url) {
            return Err(ApiError::BadRequest("title or url missing".to_string()));
        }
        Ok(BlogDraft {
            title: self.title.unwrap_or_default(),
            author: self.author.unwrap_or_default(),
            url: self.url.unwrap_or_default(),
            likes: self.likes.unwrap_or(0),
        })
    }
}

/// Creator of a blog as embedded in blog responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    id: String,
    username: String,
    name: String,
}

/// A blog with its creator populated.
#[derive(Debug, Clone, Serialize)]
pub struct BlogView {
    id: String,
    title: String,
    author: String,
    url: String,
    likes: u64,
    user: Option<UserSummary>,
    comments: Vec<String>,
}

fn blog_view(store: &BlogStore, blog: &Blog) -> BlogView {
    let user = blog
        .user
        .as_deref()
        .and_then(|id| store.get_user(id))
        .map(|u| UserSummary {
            id: u.id.clone(),
            username: u.username.clone(),
            name: u.name.clone(),
        });
    BlogView {
        id: blog.id.clone(),
        title: blog.title.clone(),
        author: blog.author.clone(),
        url: blog.url.clone(),
        likes: blog.likes,
        user,
        comments: blog.comments.clone(),
    }
}

pub async fn list_blogs(State(state): State<AppState>) -> Json<Vec<BlogView>> {
    let store = state.store.read().await;
    Json(store.blogs().iter().map(|b| blog_view(&store, b)).collect())
}

pub async fn get_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BlogView>, ApiError> {
    let store = state.store.read().await;
    match store.get_blog(&id)? {
        Some(blog) => Ok(Json(blog_view(&store, blog))),
        None => Err(ApiError::NotFound("blog not found".to_string())),
    }
}

pub async fn create_blog(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<BlogPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<BlogView>), ApiError> {
    let Json(payload) = payload?;
    let draft = payload.into_draft()?;

    let view = state
        .mutate(|store| {
            let blog = store.create_blog(draft, Some(&user.id))?;
            Ok(blog_view(store, &blog))
        })
        .await?;

    tracing::info!(blog = %view.id, user = %user.username, "blog created");
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn update_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<BlogPayload>, JsonRejection>,
) -> Result<Json<BlogView>, ApiError> {
    let Json(payload) = payload?;
    let draft = payload.into_draft()?;

    let view = state
        .mutate(|store| match store.update_blog(&id, draft)? {
            Some(blog) => Ok(blog_view(store, &blog)),
            None => Err(ApiError::NotFound("blog not found".to_string())),
        })
        .await?;

    Ok(Json(view))
}

/// Only the creator may delete a blog; blogs without a creator cannot be
/// deleted through the API. Deleting a missing blog succeeds.
pub async fn delete_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: AuthUser,
) -> Result<StatusCode, ApiError> {
    let removed = state
        .mutate(|store| {
            if let Some(blog) = store.get_blog(&id)? {
                if blog.user.as_deref() != Some(user.id.as_str()) {
                    return Err(ApiError::Forbidden(
                        "only the creator can delete a blog".to_string(),
                    ));
                }
            }
            Ok(store.delete_blog(&id)?)
        })
        .await?;

    if let Some(blog) = removed {
        tracing::info!(blog = %blog.id, user = %user.username, "blog deleted");
    }

    Ok(StatusCode::NO_CONTENT)
}
