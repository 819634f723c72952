use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::rooms::Room;

use super::{RoomStore, StoreError};

#[derive(Clone)]
pub struct SqliteRoomStore {
    db_pool: SqlitePool,
}

impl SqliteRoomStore {
    pub fn new(db_pool: SqlitePool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl RoomStore for SqliteRoomStore {
    async fn create(&self, room: &Room) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO rooms (id,data,created_at,expires_at) VALUES (?,?,?,?)")
            .bind(&room.id)
            .bind(&room.data)
            .bind(room.created_at)
            .bind(room.expires_at)
            .execute(&self.db_pool)
            .await
            .map_err(|err| match err {
                sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                    StoreError::DuplicateKey(room.id.clone())
                }
                err => StoreError::Connectivity(err),
            })?;

        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Room>, StoreError> {
        let rooms = sqlx::query_as::<_, Room>("SELECT id,data,created_at,expires_at FROM rooms")
            .fetch_all(&self.db_pool)
            .await?;

        Ok(rooms)
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM rooms WHERE id=?")
            .bind(id)
            .execute(&self.db_pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
