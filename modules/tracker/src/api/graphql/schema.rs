use std::sync::Arc;

use async_graphql::{EmptySubscription, Schema};
use blobstore::BlobStore;

use crate::api::graphql::mutation::MutationRoot;
use crate::api::graphql::query::QueryRoot;
use crate::domain::service::Service;

pub type TrackerSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(service: Arc<Service>, blobs: Arc<dyn BlobStore>) -> TrackerSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(service)
        .data(blobs)
        .finish()
}
