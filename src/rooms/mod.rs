pub mod id;
mod new;
mod remove;
mod room;

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    routing::{delete, post},
};
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{debug, error, info};

use crate::{
    AppState,
    reaper::{Reaper, Reconciled},
    store::{RoomStore, StoreError},
};

pub use room::Room;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/room", post(new::new_room))
        .route("/room/{id}", delete(remove::remove_room))
}

#[derive(Debug, Error)]
pub enum RoomError {
    /// Id generation or persistence failed. Nothing was stored and nothing armed.
    #[error("failed to create room")]
    CreationFailed(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Room lifecycle: creation, administrative deletion and the startup bootstrap.
#[derive(Clone)]
pub struct Rooms {
    store: Arc<dyn RoomStore>,
    reaper: Reaper,
    ttl: Duration,
}

impl Rooms {
    pub fn new(store: Arc<dyn RoomStore>, reaper: Reaper, ttl: Duration) -> Self {
        Self { store, reaper, ttl }
    }

    pub fn reaper(&self) -> &Reaper {
        &self.reaper
    }

    /// Persists a fresh room and arms its deletion. The timer is only armed once the record
    /// is stored.
    pub async fn create(&self) -> Result<Room, RoomError> {
        let id = id::generate().map_err(|err| {
            error!(error = %err, "failed to generate room id");
            RoomError::CreationFailed(err.into())
        })?;

        let room = Room::new(id, OffsetDateTime::now_utc(), self.ttl).ok_or_else(|| {
            error!(ttl = ?self.ttl, "room ttl overflows the expiry timestamp");
            RoomError::CreationFailed(format!("ttl {:?} is out of range", self.ttl).into())
        })?;

        self.store.create(&room).await.map_err(|err| {
            error!(room_id = %room.id, error = %err, "failed to create room in database");
            RoomError::CreationFailed(err.into())
        })?;

        self.reaper.arm(&room.id, self.ttl);
        debug!(room_id = %room.id, "created room");

        Ok(room)
    }

    /// Deletes a room ahead of its expiry. Returns whether it existed.
    ///
    /// The timer stays armed when the store fails, so the room still expires on time.
    pub async fn delete(&self, id: &str) -> Result<bool, RoomError> {
        let deleted = self.store.delete_by_id(id).await?;
        self.reaper.disarm(id);
        if deleted {
            info!(room_id = id, "deleted room");
        }
        Ok(deleted)
    }

    /// Re-arms or reaps every persisted room. Run once at startup.
    pub async fn bootstrap(&self) -> Result<Reconciled, RoomError> {
        let rooms = self.store.find_all().await?;
        Ok(self.reaper.reconcile(rooms, OffsetDateTime::now_utc()).await)
    }
}
