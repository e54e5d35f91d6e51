//! SeaORM-backed implementations of the domain repository ports.
//!
//! One store struct implements all five ports so the cascade closures can
//! run inside a single transaction over the shared connection.

mod attachments;
mod comments;
mod projects;
mod tasks;
mod users;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::domain::service::Service;

pub struct SeaOrmStore {
    db: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub(crate) fn conn(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Wire a [`Service`] onto a single SeaORM connection.
pub fn build_service(db: DatabaseConnection) -> Service {
    let store = Arc::new(SeaOrmStore::new(db));
    Service::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        store,
    )
}
