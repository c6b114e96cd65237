//! Login: exchange username and password for a token.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::verify_password;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    token: String,
    username: String,
    name: String,
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginPayload>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(payload) = payload?;

    let user = state
        .store
        .read()
        .await
        .find_user_by_username(&payload.username)
        .cloned();

    let rejected = || {
        tracing::debug!(username = %payload.username, "login rejected");
        ApiError::Unauthorized("invalid username or password".to_string())
    };

    let Some(user) = user else {
        return Err(rejected());
    };

    let password = payload.password.clone();
    let password_hash = user.password_hash.clone();
    let verified = tokio::task::spawn_blocking(move || verify_password(&password, &password_hash))
        .await
        .map_err(anyhow::Error::from)?;
    if !verified {
        return Err(rejected());
    }

    let token = state.jwt.create_token(&user.id, &user.username)?;

    Ok(Json(LoginResponse {
        token,
        username: user.username,
        name: user.name,
    }))
}
