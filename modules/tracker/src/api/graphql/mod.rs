//! GraphQL projection. Semantically equivalent to the REST surface: both
//! translate into the same service calls, so equivalent queries see the same
//! rows. Unlike REST, every relation field resolves to a typed object.

pub mod mutation;
pub mod query;
pub mod schema;
pub mod types;

use std::sync::Arc;

use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use authn::CurrentUser;
use axum::{extract::State, Extension};

use crate::api::state::AppState;
use crate::contract::error::TrackerError;

/// POST /graphql — sits behind the same Bearer middleware as the REST
/// routes; the resolved identity is threaded into the request data so
/// mutations can default ownership/authorship from it.
pub async fn graphql_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let req = req.into_inner().data(user);
    state.schema.execute(req).await.into()
}

/// Surface a domain error in the GraphQL errors array with a stable code.
pub(crate) fn gql_error(e: TrackerError) -> async_graphql::Error {
    use async_graphql::ErrorExtensions;

    let code = match &e {
        TrackerError::NotFound { .. } => "NOT_FOUND",
        TrackerError::Validation { .. } => "VALIDATION",
        TrackerError::Conflict { .. } => "CONFLICT",
        TrackerError::Integrity { .. } => "INTEGRITY",
        TrackerError::Internal { .. } => "INTERNAL",
    };
    async_graphql::Error::new(e.to_string()).extend_with(|_, ext| ext.set("code", code))
}
