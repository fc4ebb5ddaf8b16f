//! Domain engines: streak state machine and progress aggregation.

pub mod stats;
pub mod streak;

pub use stats::{aggregate, ExerciseCount, ProgressStats, TimePeriods};
pub use streak::{StreakEngine, StreakState, DATE_FORMAT};
