//! Domain model (workouts, feed entries, channel names).

pub mod feed;
pub mod workout;

pub use feed::{EntryId, Notification, SocialPost};
pub use workout::{Exercise, Weight, Workout, TIMESTAMP_FORMAT};

/// Fallback identity when a job omits `user_id`.
pub const DEFAULT_USER: &str = "default_user";

/// Well-known slot names. One file per channel under the data directory.
pub mod channel {
    pub const NOTIFICATION_INPUT: &str = "notification-input";
    pub const SOCIAL_INPUT: &str = "social-input";
    pub const PROGRESS_INPUT: &str = "progress-input";
    pub const PROGRESS_OUTPUT: &str = "progress-output";
    pub const STREAK_INPUT: &str = "streak-input";
    pub const STREAK_OUTPUT: &str = "streak-output";
}
