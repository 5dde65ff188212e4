//! src/storage/postgres.rs
use super::{StoreError, Subscription, SubscriptionStore};
use crate::configuration::DatabaseSettings;
use crate::domain::SubscriberEmail;
use anyhow::Context;
use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool and brings the `emails` table up to date.
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, anyhow::Error> {
        let pool = PgPoolOptions::new()
            .test_before_acquire(true)
            .connect(settings.connection_string().expose_secret())
            .await
            .context("Failed to connect to Postgres")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to migrate the database")?;

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl SubscriptionStore for PostgresStore {
    #[tracing::instrument(name = "Saving new subscriber in the database", skip(self))]
    async fn insert(&self, email: &SubscriberEmail) -> Result<Subscription, StoreError> {
        let address: &str = email.as_ref();
        let saved = sqlx::query_as::<_, Subscription>(
            r#"
    INSERT INTO emails (email)
    VALUES ($1)
    ON CONFLICT (email) DO NOTHING
    RETURNING email, created_at
            "#,
        )
        .bind(address)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:#?}", e);
            e
        })
        .context("Failed to insert new subscriber")?;

        saved.ok_or(StoreError::AlreadySubscribed)
    }

    #[tracing::instrument(name = "Listing subscribers from the database", skip(self))]
    async fn list(&self) -> Result<Vec<Subscription>, StoreError> {
        let rows = sqlx::query_as::<_, Subscription>(
            r#"
        SELECT email, created_at
        FROM emails
        ORDER BY created_at DESC, id DESC
        "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to retrieve subscribers")?;

        Ok(rows)
    }
}
