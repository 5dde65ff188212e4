//! src/storage/mod.rs
use crate::configuration::{DatabaseSettings, StorageBackend, StorageSettings};
use crate::domain::SubscriberEmail;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

mod file;
pub use file::FileStore;

mod postgres;
pub use postgres::PostgresStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Subscription {
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(thiserror::Error)]
pub enum StoreError {
    #[error("Email already subscribed")]
    AlreadySubscribed,
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl std::fmt::Debug for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        crate::routes::error_chain_fmt(self, f)
    }
}

/// Where accepted addresses end up. Uniqueness of `email` is enforced here,
/// never by the validator.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    async fn insert(&self, email: &SubscriberEmail) -> Result<Subscription, StoreError>;

    /// Every stored subscription, newest first.
    async fn list(&self) -> Result<Vec<Subscription>, StoreError>;
}

#[tracing::instrument(name = "Building the subscription store", skip(database))]
pub async fn build_store(
    storage: &StorageSettings,
    database: &DatabaseSettings,
) -> Result<Arc<dyn SubscriptionStore>, anyhow::Error> {
    let store: Arc<dyn SubscriptionStore> = match storage.backend {
        StorageBackend::Postgres => Arc::new(PostgresStore::connect(database).await?),
        StorageBackend::File => Arc::new(FileStore::new(&storage.file_path)),
    };

    Ok(store)
}
