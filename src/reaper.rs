//! Expiry scheduling.
//!
//! Every live room has at most one armed deletion: a tokio task that sleeps for the room's
//! remaining time to live and then deletes it from the store. Timers are not persisted; after a
//! restart [`Reaper::reconcile`] rebuilds them from the stored expiry timestamps and reaps any
//! room that expired while the process was down.
//!
//! Deletion failures are logged and dropped. A room outliving its expiry by a little is
//! acceptable, the next bootstrap picks it up again.

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use time::OffsetDateTime;
use tokio::task::AbortHandle;
use tracing::{Instrument, Span, debug, error, info};

use crate::{rooms::Room, store::RoomStore};

/// Outcome of a reconcile pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reconciled {
    /// Rooms still alive, now armed for their remaining time.
    pub armed: usize,
    /// Rooms found expired and deleted.
    pub reaped: usize,
    /// Rooms found expired whose deletion failed.
    pub failed: usize,
}

impl Reconciled {
    pub fn total(&self) -> usize {
        self.armed + self.reaped + self.failed
    }
}

struct Armed {
    generation: u64,
    handle: AbortHandle,
}

#[derive(Clone)]
pub struct Reaper {
    inner: Arc<Inner>,
}

struct Inner {
    store: Arc<dyn RoomStore>,
    armed: Mutex<HashMap<String, Armed>>,
    generation: AtomicU64,
    span: Span,
}

impl Reaper {
    /// `span` scopes every log line emitted by the reaper and its timers.
    pub fn new(store: Arc<dyn RoomStore>, span: Span) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                armed: Mutex::new(HashMap::new()),
                generation: AtomicU64::new(0),
                span,
            }),
        }
    }

    /// Schedules deletion of `id` after `ttl`. Re-arming an id replaces its previous timer.
    ///
    /// Must be called from within a tokio runtime.
    pub fn arm(&self, id: &str, ttl: Duration) {
        let _entered = self.inner.span.enter();
        let generation = self.inner.generation.fetch_add(1, Ordering::Relaxed);

        // held across the spawn so the timer can't release its entry before it is inserted
        let mut armed = self.armed();

        let reaper = self.clone();
        let room_id = id.to_owned();
        let task = tokio::spawn(
            async move {
                tokio::time::sleep(ttl).await;
                if reaper.release(&room_id, generation) {
                    reaper.reap(&room_id).await;
                }
            }
            .instrument(self.inner.span.clone()),
        );

        let previous = armed.insert(
            id.to_owned(),
            Armed {
                generation,
                handle: task.abort_handle(),
            },
        );
        if let Some(previous) = previous {
            previous.handle.abort();
            debug!(room_id = id, "replaced armed deletion");
        }

        debug!(room_id = id, ttl = ?ttl, "armed deletion");
    }

    /// Cancels the armed deletion for `id`. Returns whether one was armed.
    pub fn disarm(&self, id: &str) -> bool {
        let Some(previous) = self.armed().remove(id) else {
            return false;
        };
        previous.handle.abort();

        let _entered = self.inner.span.enter();
        debug!(room_id = id, "disarmed deletion");
        true
    }

    pub fn is_armed(&self, id: &str) -> bool {
        self.armed().contains_key(id)
    }

    pub fn armed_count(&self) -> usize {
        self.armed().len()
    }

    /// Startup pass over every persisted room: rooms already due are deleted before this
    /// returns, the rest are armed for whatever time they have left.
    pub async fn reconcile(&self, rooms: Vec<Room>, now: OffsetDateTime) -> Reconciled {
        let span = self.inner.span.clone();
        async move {
            let mut reconciled = Reconciled::default();

            for room in rooms {
                match room.remaining(now) {
                    Some(remaining) => {
                        self.arm(&room.id, remaining);
                        info!(room_id = %room.id, remaining = ?remaining, "scheduled deletion");
                        reconciled.armed += 1;
                    }
                    None => {
                        self.disarm(&room.id);
                        if self.reap(&room.id).await {
                            reconciled.reaped += 1;
                        } else {
                            reconciled.failed += 1;
                        }
                    }
                }
            }

            info!(
                rooms = reconciled.total(),
                armed = reconciled.armed,
                reaped = reconciled.reaped,
                failed = reconciled.failed,
                "bootstrapped rooms"
            );
            reconciled
        }
        .instrument(span)
        .await
    }

    /// Deletes an expired room and logs the outcome. A room that is already gone counts as
    /// deleted.
    async fn reap(&self, id: &str) -> bool {
        match self.inner.store.delete_by_id(id).await {
            Ok(true) => {
                info!(room_id = id, "deleted expired room");
                true
            }
            Ok(false) => {
                info!(room_id = id, "expired room was already deleted");
                true
            }
            Err(err) => {
                error!(room_id = id, error = %err, "failed to delete expired room");
                false
            }
        }
    }

    /// Drops the registry entry of a firing timer. False if the timer was disarmed or
    /// superseded in the meantime, in which case it must not delete anything.
    fn release(&self, id: &str, generation: u64) -> bool {
        let mut armed = self.armed();
        match armed.get(id) {
            Some(current) if current.generation == generation => {
                armed.remove(id);
                true
            }
            _ => false,
        }
    }

    fn armed(&self) -> MutexGuard<'_, HashMap<String, Armed>> {
        self.inner
            .armed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
