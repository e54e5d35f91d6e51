use std::sync::Arc;

use authn::AuthnConfig;
use blobstore::BlobStore;

use crate::api::graphql::schema::{build_schema, TrackerSchema};
use crate::domain::service::Service;

/// Shared server state for both API projections.
pub struct AppState {
    pub service: Arc<Service>,
    pub authn: AuthnConfig,
    pub blobs: Arc<dyn BlobStore>,
    pub schema: TrackerSchema,
}

impl AppState {
    pub fn new(service: Arc<Service>, authn: AuthnConfig, blobs: Arc<dyn BlobStore>) -> Arc<Self> {
        let schema = build_schema(service.clone(), blobs.clone());
        Arc::new(Self {
            service,
            authn,
            blobs,
            schema,
        })
    }
}
