//! Bearer-token middleware for the protected routes.
//!
//! Validates the access token and injects the resolved [`CurrentUser`] into
//! request extensions; handlers and the GraphQL endpoint read it from there.

use std::sync::Arc;

use authn::AuthnError;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::rest::error::ApiError;
use crate::api::state::AppState;

pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let user = authn::authenticate_bearer(&state.authn, header).map_err(|e| match e {
        AuthnError::MissingCredentials => {
            ApiError::Unauthorized("Missing or malformed Authorization header".to_string())
        }
        _ => ApiError::Unauthorized("Invalid or expired token".to_string()),
    })?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
