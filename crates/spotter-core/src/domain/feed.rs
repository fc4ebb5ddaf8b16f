//! Feed entries: notifications and social posts.
//!
//! Entries are immutable once appended (the single exception is the `read`
//! flag on notifications). ULIDs give each entry a sortable identity so the
//! CLI can address one without positional indexing.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use super::workout::TIMESTAMP_FORMAT;

pub type EntryId = Ulid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: EntryId,
    pub user_id: String,
    pub message: String,
    pub timestamp: String,
    pub read: bool,
}

impl Notification {
    /// The one notification the system currently produces.
    pub fn workout_completed(user_id: impl Into<String>, at: NaiveDateTime) -> Self {
        Self {
            id: Ulid::new(),
            user_id: user_id.into(),
            message: "Workout completed! 💪".to_string(),
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
            read: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialPost {
    pub id: EntryId,
    pub user_id: String,
    pub content: String,
    pub timestamp: String,
}

impl SocialPost {
    pub fn new(
        user_id: impl Into<String>,
        content: impl Into<String>,
        at: NaiveDateTime,
    ) -> Self {
        Self {
            id: Ulid::new(),
            user_id: user_id.into(),
            content: content.into(),
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(7, 30, 0)
            .unwrap()
    }

    #[test]
    fn workout_completed_starts_unread() {
        let n = Notification::workout_completed("alice", at());
        assert!(!n.read);
        assert_eq!(n.timestamp, "2024-01-15 07:30");
        assert_eq!(n.message, "Workout completed! 💪");
    }

    #[test]
    fn entries_roundtrip_json() {
        let p = SocialPost::new("bob", "new squat PR", at());
        let s = serde_json::to_string(&p).unwrap();
        let back: SocialPost = serde_json::from_str(&s).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn entry_ids_are_unique() {
        let a = Notification::workout_completed("alice", at());
        let b = Notification::workout_completed("alice", at());
        assert_ne!(a.id, b.id);
    }
}
