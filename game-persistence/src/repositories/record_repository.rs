use async_trait::async_trait;
use sea_orm::{
    ActiveValue, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect,
};
use tracing::debug;

use crate::entities::{game_records, prelude::*};
use game_core::RecordStore;
use game_types::{GameRecord, StoreError};

pub struct RecordRepository {
    db: DatabaseConnection,
}

fn db_error(e: DbErr) -> StoreError {
    StoreError::Database {
        message: e.to_string(),
    }
}

impl RecordRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_record(model: game_records::Model) -> Result<GameRecord, StoreError> {
        let attempts = u32::try_from(model.attempts).map_err(|_| StoreError::Decode {
            message: format!("record {} has negative attempts", model.id),
        })?;

        Ok(GameRecord {
            name: model.name,
            attempts,
            time_seconds: model.time_seconds,
            created_at: Some(model.created_at.to_rfc3339()),
        })
    }

    pub async fn count(&self) -> Result<u64, StoreError> {
        GameRecords::find().count(&self.db).await.map_err(db_error)
    }
}

#[async_trait]
impl RecordStore for RecordRepository {
    async fn fetch_top(&self, limit: u64) -> Result<Vec<GameRecord>, StoreError> {
        let models = GameRecords::find()
            .order_by_asc(game_records::Column::Attempts)
            .order_by_asc(game_records::Column::TimeSeconds)
            .order_by_asc(game_records::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(db_error)?;

        models.into_iter().map(Self::model_to_record).collect()
    }

    async fn insert(&self, record: &GameRecord) -> Result<(), StoreError> {
        let attempts = i32::try_from(record.attempts).map_err(|_| StoreError::Database {
            message: format!("attempt count {} does not fit the schema", record.attempts),
        })?;

        let model = game_records::ActiveModel {
            id: ActiveValue::NotSet,
            name: ActiveValue::Set(record.name.clone()),
            attempts: ActiveValue::Set(attempts),
            time_seconds: ActiveValue::Set(record.time_seconds),
            created_at: ActiveValue::Set(chrono::Utc::now().into()),
        };

        let inserted = GameRecords::insert(model)
            .exec(&self.db)
            .await
            .map_err(db_error)?;
        debug!("Stored record {} for {}", inserted.last_insert_id, record.name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::connect_to_memory_database;
    use migration::{Migrator, MigratorTrait};

    async fn setup_test_db() -> RecordRepository {
        let db = connect_to_memory_database().await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        RecordRepository::new(db)
    }

    #[tokio::test]
    async fn test_empty_store() {
        let repo = setup_test_db().await;

        assert_eq!(repo.fetch_best().await.unwrap(), None);
        assert!(repo.fetch_top(10).await.unwrap().is_empty());
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_insert_assigns_created_at() {
        let repo = setup_test_db().await;

        repo.insert(&GameRecord::new("Alice", 4, 12.34)).await.unwrap();

        let best = repo.fetch_best().await.unwrap().unwrap();
        assert_eq!(best.name, "Alice");
        assert_eq!(best.attempts, 4);
        assert_eq!(best.time_seconds, 12.34);
        assert!(best.created_at.is_some());
    }

    #[tokio::test]
    async fn test_fewer_attempts_rank_first() {
        let repo = setup_test_db().await;

        repo.insert(&GameRecord::new("A", 3, 5.0)).await.unwrap();
        repo.insert(&GameRecord::new("B", 2, 9.0)).await.unwrap();

        let top = repo.fetch_top(10).await.unwrap();
        let names: Vec<_> = top.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[tokio::test]
    async fn test_time_breaks_attempt_ties() {
        let repo = setup_test_db().await;

        repo.insert(&GameRecord::new("Slow", 5, 30.5)).await.unwrap();
        repo.insert(&GameRecord::new("Fast", 5, 8.25)).await.unwrap();
        repo.insert(&GameRecord::new("Later", 5, 8.25)).await.unwrap();

        let top = repo.fetch_top(10).await.unwrap();
        let names: Vec<_> = top.iter().map(|r| r.name.as_str()).collect();
        // Exact ties keep insertion order
        assert_eq!(names, vec!["Fast", "Later", "Slow"]);
    }

    #[tokio::test]
    async fn test_leaderboard_limit() {
        let repo = setup_test_db().await;

        for i in 1..=5 {
            repo.insert(&GameRecord::new(format!("User {}", i), 10 - i, 1.0))
                .await
                .unwrap();
        }

        let top = repo.fetch_top(3).await.unwrap();
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].attempts, 5);
        assert_eq!(top[1].attempts, 6);
        assert_eq!(top[2].attempts, 7);
        assert_eq!(repo.count().await.unwrap(), 5);
    }
}
