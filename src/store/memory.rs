use std::collections::{HashMap, hash_map::Entry};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::rooms::Room;

use super::{RoomStore, StoreError};

/// Process-local store. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryRoomStore {
    rooms: RwLock<HashMap<String, Room>>,
}

impl MemoryRoomStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.rooms.read().await.contains_key(id)
    }

    pub async fn len(&self) -> usize {
        self.rooms.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rooms.read().await.is_empty()
    }
}

#[async_trait]
impl RoomStore for MemoryRoomStore {
    async fn create(&self, room: &Room) -> Result<(), StoreError> {
        match self.rooms.write().await.entry(room.id.clone()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateKey(room.id.clone())),
            Entry::Vacant(slot) => {
                slot.insert(room.clone());
                Ok(())
            }
        }
    }

    async fn find_all(&self) -> Result<Vec<Room>, StoreError> {
        Ok(self.rooms.read().await.values().cloned().collect())
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.rooms.write().await.remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use time::OffsetDateTime;

    use super::*;

    #[tokio::test]
    async fn create_find_delete() {
        let store = MemoryRoomStore::new();
        let now = OffsetDateTime::now_utc();
        let room = Room::new("q1w2e3".to_owned(), now, Duration::from_secs(60)).unwrap();

        store.create(&room).await.unwrap();
        assert!(matches!(
            store.create(&room).await,
            Err(StoreError::DuplicateKey(id)) if id == "q1w2e3"
        ));
        assert_eq!(store.find_all().await.unwrap().len(), 1);

        assert!(store.delete_by_id("q1w2e3").await.unwrap());
        assert!(!store.delete_by_id("q1w2e3").await.unwrap());
        assert!(store.is_empty().await);
    }
}
