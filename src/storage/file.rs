//! src/storage/file.rs
use super::{StoreError, Subscription, SubscriptionStore};
use crate::domain::SubscriberEmail;
use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Append-only text file, one JSON-encoded [`Subscription`] per line.
///
/// Addresses may carry any ASCII in their local part, line breaks included;
/// JSON escaping keeps every record on its own line.
pub struct FileStore {
    path: PathBuf,
    // Held across the duplicate scan and the append, and by readers.
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Vec<Subscription>, anyhow::Error> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read subscribers from {}", self.path.display())
                })
            }
        };

        Ok(contents.lines().filter_map(parse_line).collect())
    }
}

fn parse_line(line: &str) -> Option<Subscription> {
    if line.trim().is_empty() {
        return None;
    }

    let parsed = serde_json::from_str::<Subscription>(line).ok();

    if parsed.is_none() {
        tracing::warn!("Skipping unparseable subscriber line: {:?}", line);
    }

    parsed
}

#[async_trait]
impl SubscriptionStore for FileStore {
    #[tracing::instrument(name = "Saving new subscriber in the file", skip(self))]
    async fn insert(&self, email: &SubscriberEmail) -> Result<Subscription, StoreError> {
        let address: &str = email.as_ref();
        let _guard = self.lock.lock().await;

        let existing = self.read_all().await?;
        if existing.iter().any(|s| s.email == address) {
            return Err(StoreError::AlreadySubscribed);
        }

        let subscription = Subscription {
            email: address.to_string(),
            created_at: Utc::now(),
        };
        let mut line =
            serde_json::to_string(&subscription).context("Failed to encode subscriber")?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("Failed to open {}", self.path.display()))?;
        file.write_all(line.as_bytes())
            .await
            .context("Failed to append subscriber")?;
        file.flush().await.context("Failed to flush subscriber file")?;

        Ok(subscription)
    }

    #[tracing::instrument(name = "Listing subscribers from the file", skip(self))]
    async fn list(&self) -> Result<Vec<Subscription>, StoreError> {
        let mut subscriptions = {
            let _guard = self.lock.lock().await;
            self.read_all().await?
        };
        // Lines are in insertion order; reversing first keeps the newest
        // entry ahead when two share a timestamp.
        subscriptions.reverse();
        subscriptions.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(subscriptions)
    }
}
