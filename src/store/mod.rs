//! Durable room records.
//!
//! The store is the only place room ids are guaranteed unique: inserting an id that already
//! exists is an error, never an overwrite.

mod memory;
mod sqlite;

use async_trait::async_trait;
use thiserror::Error;

use crate::rooms::Room;

pub use memory::MemoryRoomStore;
pub use sqlite::SqliteRoomStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("room {0} already exists")]
    DuplicateKey(String),
    #[error("room store unavailable: {0}")]
    Connectivity(#[from] sqlx::Error),
}

#[async_trait]
pub trait RoomStore: Send + Sync {
    async fn create(&self, room: &Room) -> Result<(), StoreError>;

    /// Every persisted room, in no particular order.
    async fn find_all(&self) -> Result<Vec<Room>, StoreError>;

    /// Returns whether a room was removed. A missing id is not an error.
    async fn delete_by_id(&self, id: &str) -> Result<bool, StoreError>;
}
