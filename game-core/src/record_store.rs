use async_trait::async_trait;
use game_types::{GameRecord, StoreError};
use tokio::sync::RwLock;
use tracing::warn;

use crate::ScoringEngine;

/// Persists finished rounds and ranks them by (attempts, time_seconds).
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Top `limit` records, best first
    async fn fetch_top(&self, limit: u64) -> Result<Vec<GameRecord>, StoreError>;

    /// Append a record. The store assigns `created_at`.
    async fn insert(&self, record: &GameRecord) -> Result<(), StoreError>;

    /// The single best record, if any
    async fn fetch_best(&self) -> Result<Option<GameRecord>, StoreError> {
        Ok(self.fetch_top(1).await?.into_iter().next())
    }
}

/// Best record, or `None` when the store is empty or unreachable
pub async fn load_best(store: &dyn RecordStore) -> Option<GameRecord> {
    match store.fetch_best().await {
        Ok(best) => best,
        Err(e) => {
            warn!("Could not load best record, continuing without one: {}", e);
            None
        }
    }
}

/// Top records, or an empty list when the store is unreachable
pub async fn load_top(store: &dyn RecordStore, limit: u64) -> Vec<GameRecord> {
    match store.fetch_top(limit).await {
        Ok(records) => records,
        Err(e) => {
            warn!("Could not load leaderboard, showing it empty: {}", e);
            Vec::new()
        }
    }
}

/// Insert a record; a failure is logged and dropped. Returns whether it was saved.
pub async fn save_record(store: &dyn RecordStore, record: &GameRecord) -> bool {
    match store.insert(record).await {
        Ok(()) => true,
        Err(e) => {
            warn!(
                "Dropping record for {} ({} attempts, {}s): {}",
                record.name, record.attempts, record.time_seconds, e
            );
            false
        }
    }
}

/// Process-local store, kept sorted by rank
#[derive(Default)]
pub struct InMemoryRecordStore {
    records: RwLock<Vec<GameRecord>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn fetch_top(&self, limit: u64) -> Result<Vec<GameRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records.iter().take(limit as usize).cloned().collect())
    }

    async fn insert(&self, record: &GameRecord) -> Result<(), StoreError> {
        let mut stored = record.clone();
        stored.created_at = Some(chrono::Utc::now().to_rfc3339());

        let mut records = self.records.write().await;
        // Insert after every record ranking at or above it so earlier entries keep ties
        let position = records.partition_point(|existing| {
            ScoringEngine::compare_scores(&existing.score(), &stored.score()).is_le()
        });
        records.insert(position, stored);
        Ok(())
    }
}
