use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::utils::error::Result;

/// Keyed storage for access tokens referenced by opaque webhook handles.
#[async_trait]
pub trait TokenStore {
    async fn put(&self, handle: &str, token: &str) -> Result<()>;
    async fn get(&self, handle: &str) -> Result<Option<String>>;
    /// Drops expired entries and returns how many were removed.
    async fn purge_expired(&self) -> Result<usize>;
}

/// A fresh 32-character handle. Short enough to keep webhook URLs well under
/// PLEX's length limit.
pub fn new_handle() -> String {
    Uuid::new_v4().simple().to_string()
}

#[derive(Debug, Clone)]
struct StoredToken {
    token: String,
    expires_at: Instant,
}

/// Process-local [`TokenStore`] with a fixed time-to-live. Entries do not
/// survive a restart.
#[derive(Clone)]
pub struct InMemoryTokenStore {
    entries: Arc<Mutex<HashMap<String, StoredToken>>>,
    ttl: Duration,
}

impl InMemoryTokenStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn put(&self, handle: &str, token: &str) -> Result<()> {
        let stored = StoredToken {
            token: token.to_string(),
            expires_at: Instant::now() + self.ttl,
        };
        self.entries.lock().await.insert(handle.to_string(), stored);
        Ok(())
    }

    async fn get(&self, handle: &str) -> Result<Option<String>> {
        let mut entries = self.entries.lock().await;
        match entries.get(handle) {
            Some(stored) if stored.expires_at > Instant::now() => Ok(Some(stored.token.clone())),
            Some(_) => {
                entries.remove(handle);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn purge_expired(&self) -> Result<usize> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, stored| stored.expires_at > now);
        Ok(before - entries.len())
    }
}
