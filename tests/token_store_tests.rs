use std::sync::Arc;
use std::time::Duration;

use plex_anilist_scrobbler::services::token_store::new_handle;
use plex_anilist_scrobbler::services::{HandleSweeper, InMemoryTokenStore, TokenStore};
use tokio::time::sleep;

#[tokio::test]
async fn test_put_then_get() {
    let store = InMemoryTokenStore::new(Duration::from_secs(60));
    store.put("handle-1", "token-1").await.unwrap();

    assert_eq!(store.get("handle-1").await.unwrap().as_deref(), Some("token-1"));
    assert_eq!(store.get("handle-2").await.unwrap(), None);
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_put_overwrites() {
    let store = InMemoryTokenStore::new(Duration::from_secs(60));
    store.put("h", "old").await.unwrap();
    store.put("h", "new").await.unwrap();

    assert_eq!(store.get("h").await.unwrap().as_deref(), Some("new"));
}

#[tokio::test]
async fn test_expired_entries_are_not_returned() {
    let store = InMemoryTokenStore::new(Duration::from_millis(20));
    store.put("h", "token").await.unwrap();

    sleep(Duration::from_millis(50)).await;

    assert_eq!(store.get("h").await.unwrap(), None);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_purge_expired_counts_removed_entries() {
    let store = InMemoryTokenStore::new(Duration::from_millis(20));
    store.put("a", "1").await.unwrap();
    store.put("b", "2").await.unwrap();

    assert_eq!(store.purge_expired().await.unwrap(), 0);
    sleep(Duration::from_millis(50)).await;
    assert_eq!(store.purge_expired().await.unwrap(), 2);
    assert!(store.is_empty().await);
}

#[test]
fn test_handles_are_short_and_unique() {
    let first = new_handle();
    let second = new_handle();

    assert_eq!(first.len(), 32);
    assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(first, second);
}

#[tokio::test]
async fn test_sweeper_start_and_stop() {
    let store: Arc<dyn TokenStore + Send + Sync> =
        Arc::new(InMemoryTokenStore::new(Duration::from_secs(60)));
    let sweeper = HandleSweeper::new(store, Duration::from_secs(1));

    assert!(!sweeper.is_active());
    sweeper.start();
    assert!(sweeper.is_active());

    sweeper.stop();
    assert!(!sweeper.is_active());
}

#[tokio::test]
async fn test_sweeper_purges_expired_handles() {
    let memory = InMemoryTokenStore::new(Duration::from_millis(10));
    memory.put("h", "token").await.unwrap();

    let store: Arc<dyn TokenStore + Send + Sync> = Arc::new(memory.clone());
    let sweeper = HandleSweeper::new(store, Duration::from_secs(1));
    sweeper.start();

    sleep(Duration::from_millis(1300)).await;
    assert!(memory.is_empty().await);
    sweeper.stop();
}
