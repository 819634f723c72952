use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::{FromRow, types::Json};
use time::OffsetDateTime;

/// An ephemeral room.
///
/// On the wire the expiry is sent as `updatedAt`; existing clients read that name.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Room {
    pub id: String,
    pub data: Json<Value>,
    #[serde(rename = "createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(rename = "updatedAt", with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

impl Room {
    /// A room with an empty payload that expires `ttl` after `now`, or `None` when the expiry
    /// is past the largest representable timestamp.
    pub fn new(id: String, now: OffsetDateTime, ttl: Duration) -> Option<Self> {
        let expires_at = time::Duration::try_from(ttl)
            .ok()
            .and_then(|ttl| now.checked_add(ttl))?;

        Some(Self {
            id,
            data: Json(Value::Object(Map::new())),
            created_at: now,
            expires_at,
        })
    }

    /// Time left before expiry, or `None` once the room is due.
    pub fn remaining(&self, now: OffsetDateTime) -> Option<Duration> {
        let left = self.expires_at - now;
        if left.is_positive() {
            Duration::try_from(left).ok()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn expiry_is_creation_plus_ttl() {
        let now = datetime!(2025-03-01 12:00:00 UTC);
        let room = Room::new("abc123".to_owned(), now, Duration::from_secs(3600)).unwrap();

        assert_eq!(room.expires_at - room.created_at, time::Duration::hours(1));
        assert_eq!(room.data.0, serde_json::json!({}));
    }

    #[test]
    fn remaining_keeps_subsecond_precision() {
        let now = datetime!(2025-03-01 12:00:00 UTC);
        let room = Room::new("abc123".to_owned(), now, Duration::from_millis(2500)).unwrap();

        assert_eq!(
            room.remaining(now + Duration::from_millis(1000)),
            Some(Duration::from_millis(1500))
        );
    }

    #[test]
    fn due_rooms_have_nothing_remaining() {
        let now = datetime!(2025-03-01 12:00:00 UTC);
        let room = Room::new("abc123".to_owned(), now, Duration::from_secs(60)).unwrap();

        assert_eq!(room.remaining(room.expires_at), None);
        assert_eq!(room.remaining(now + Duration::from_secs(600)), None);
    }

    #[test]
    fn unrepresentable_expiry_is_refused() {
        let now = datetime!(2025-03-01 12:00:00 UTC);

        for secs in [u64::MAX, i64::MAX as u64] {
            assert!(Room::new("abc123".to_owned(), now, Duration::from_secs(secs)).is_none());
        }
    }

    #[test]
    fn wire_shape_uses_updated_at_for_expiry() {
        let now = datetime!(2025-03-01 12:00:00 UTC);
        let room = Room::new("abc123".to_owned(), now, Duration::from_secs(3600)).unwrap();

        let body = serde_json::to_value(&room).unwrap();
        assert_eq!(body["id"], "abc123");
        assert_eq!(body["data"], serde_json::json!({}));
        assert_eq!(body["createdAt"], "2025-03-01T12:00:00Z");
        assert_eq!(body["updatedAt"], "2025-03-01T13:00:00Z");
        assert!(body.get("expiresAt").is_none());
    }
}
