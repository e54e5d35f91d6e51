//! Acting user's profile.

use std::sync::Arc;

use authn::CurrentUser;
use axum::{extract::State, Extension, Json};

use crate::api::rest::dto::{ProfileInput, ProfileView};
use crate::api::rest::error::ApiError;
use crate::api::state::AppState;

/// GET /api/profile
pub async fn get(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ProfileView>, ApiError> {
    let profile = state.service.get_profile(user.id).await?;
    let account = state.service.get_user(user.id).await?;
    Ok(Json(ProfileView::from_parts(profile, account)))
}

/// PUT /api/profile
pub async fn put(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(input): Json<ProfileInput>,
) -> Result<Json<ProfileView>, ApiError> {
    let profile = state
        .service
        .upsert_profile(user.id, input.bio, input.avatar)
        .await?;
    let account = state.service.get_user(user.id).await?;
    Ok(Json(ProfileView::from_parts(profile, account)))
}
