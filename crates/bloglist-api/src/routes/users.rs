//! User registration and listing.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use bloglist_core::models::User;
use bloglist_data::store::BlogStore;
use serde::{Deserialize, Serialize};

use crate::auth::hash_password;
use crate::error::ApiError;
use crate::state::AppState;

/// Minimum password length after trimming.
const MIN_PASSWORD_LEN: usize = 3;

#[derive(Debug, Deserialize)]
pub struct NewUserPayload {
    #[serde(default)]
    username: String,
    #[serde(default)]
    name: String,
    password: Option<String>,
}

/// Blog fields embedded in user responses.
#[derive(Debug, Clone, Serialize)]
pub struct BlogSummary {
    id: String,
    title: String,
    author: String,
    url: String,
}

/// A user without the password hash, blogs populated.
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    id: String,
    username: String,
    name: String,
    blogs: Vec<BlogSummary>,
}

fn user_view(store: &BlogStore, user: &User) -> UserView {
    let blogs = user
        .blogs
        .iter()
        .filter_map(|id| store.get_blog(id).ok().flatten())
        .map(|b| BlogSummary {
            id: b.id.clone(),
            title: b.title.clone(),
            author: b.author.clone(),
            url: b.url.clone(),
        })
        .collect();
    UserView {
        id: user.id.clone(),
        username: user.username.clone(),
        name: user.name.clone(),
        blogs,
    }
}

pub async fn list_users(State(state): State<AppState>) -> Json<Vec<UserView>> {
    let store = state.store.read().await;
    Json(store.users().iter().map(|u| user_view(&store, u)).collect())
}

pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<NewUserPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<UserView>), ApiError> {
    let Json(payload) = payload?;

    let Some(password) = payload.password.filter(|p| !p.is_empty()) else {
        return Err(ApiError::BadRequest(
            "password is required field".to_string(),
        ));
    };
    if password.trim().chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::BadRequest(format!(
            "password must be minimum {MIN_PASSWORD_LEN} characters long"
        )));
    }

    // bcrypt is CPU-bound.
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(anyhow::Error::from)??;

    let view = state
        .mutate(|store| {
            let user = store.create_user(&payload.username, &payload.name, password_hash)?;
            Ok(user_view(store, &user))
        })
        .await?;

    tracing::info!(user = %view.username, "user registered");
    Ok((StatusCode::CREATED, Json(view)))
}
