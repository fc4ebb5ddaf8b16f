//! Progress aggregation: a stateless fold over the full workout history.
//!
//! Recomputed from scratch on every invocation; nothing is cached between
//! calls. A malformed workout (unparseable `start_time`) is logged and
//! skipped, and contributes to no counter at all, so the result equals the
//! aggregate of the remaining valid records.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::Workout;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressStats {
    pub total_workouts: usize,
    pub time_periods: TimePeriods,
    pub exercise_frequency: ExerciseFrequency,
    pub total_volume: f64,
}

/// Workout counts in overlapping trailing windows. A recent workout counts
/// in all three.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimePeriods {
    pub week: usize,
    pub two_weeks: usize,
    pub month: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseFrequency {
    pub top_exercises: Vec<ExerciseCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseCount {
    pub name: String,
    pub count: usize,
}

/// Fold `workouts` into summary statistics relative to `now`.
pub fn aggregate(workouts: &[Workout], now: NaiveDateTime) -> ProgressStats {
    let week_ago = now - Duration::days(7);
    let two_weeks_ago = now - Duration::days(14);
    let month_ago = now - Duration::days(30);

    let mut stats = ProgressStats::default();
    // First-encounter order; the later stable sort keeps it for tied counts.
    let mut frequency: Vec<ExerciseCount> = Vec::new();

    for workout in workouts {
        let Some(started) = workout.started_at() else {
            warn!(start_time = %workout.start_time, "skipping workout with bad start_time");
            continue;
        };

        stats.total_workouts += 1;
        if started >= week_ago {
            stats.time_periods.week += 1;
        }
        if started >= two_weeks_ago {
            stats.time_periods.two_weeks += 1;
        }
        if started >= month_ago {
            stats.time_periods.month += 1;
        }

        for exercise in &workout.exercises {
            match frequency.iter_mut().find(|c| c.name == exercise.name) {
                Some(entry) => entry.count += 1,
                None => frequency.push(ExerciseCount {
                    name: exercise.name.clone(),
                    count: 1,
                }),
            }
            if let Some(volume) = exercise.volume() {
                stats.total_volume += volume;
            }
        }
    }

    frequency.sort_by(|a, b| b.count.cmp(&a.count));
    frequency.truncate(3);
    stats.exercise_frequency.top_exercises = frequency;
    stats
}
