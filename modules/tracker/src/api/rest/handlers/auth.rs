//! Registration and token issuance.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use tracing::info;

use crate::api::rest::dto::{
    AccessTokenView, RegisterInput, TokenInput, TokenRefreshInput, TokenView, UserView,
};
use crate::api::rest::error::ApiError;
use crate::api::state::AppState;
use crate::contract::model::NewUser;

/// POST /api/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(input): Json<RegisterInput>,
) -> Result<(StatusCode, Json<UserView>), ApiError> {
    info!("Registering user '{}'", input.username);

    let user = state
        .service
        .register_user(NewUser {
            username: input.username,
            email: input.email,
            password: input.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// POST /api/token
///
/// The response never reveals whether the username or the password was wrong.
pub async fn token(
    State(state): State<Arc<AppState>>,
    Json(input): Json<TokenInput>,
) -> Result<Json<TokenView>, ApiError> {
    let user = state
        .service
        .verify_credentials(&input.username, &input.password)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    let pair = authn::issue_token_pair(&state.authn, user.id, &user.username)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(TokenView {
        access: pair.access,
        refresh: pair.refresh,
    }))
}

/// POST /api/token/refresh
pub async fn token_refresh(
    State(state): State<Arc<AppState>>,
    Json(input): Json<TokenRefreshInput>,
) -> Result<Json<AccessTokenView>, ApiError> {
    let access = authn::refresh_access_token(&state.authn, &input.refresh)
        .map_err(|_| ApiError::Unauthorized("Invalid or expired refresh token".to_string()))?;

    Ok(Json(AccessTokenView { access }))
}
