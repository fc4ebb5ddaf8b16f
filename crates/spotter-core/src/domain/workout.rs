//! Workout records as the producer writes them.
//!
//! These are transport shapes, not validated domain objects: timestamps stay
//! strings so that one bad record can be skipped instead of failing a whole
//! batch. `started_at()` is the validation point.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Timestamp format used throughout the data files ("2024-01-15 07:30").
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    pub start_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

impl Workout {
    /// Parse `start_time`. `None` marks the record malformed for
    /// time-window aggregation.
    pub fn started_at(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.start_time, TIMESTAMP_FORMAT).ok()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    pub weight: Weight,
    pub sets: u32,
    pub reps: u32,
}

impl Exercise {
    /// Volume contribution (weight × sets × reps), or `None` when the
    /// weight is not a load ("bodyweight" and friends).
    pub fn volume(&self) -> Option<f64> {
        self.weight
            .as_load()
            .map(|w| w * f64::from(self.sets) * f64::from(self.reps))
    }
}

/// Exercise weight: a number, or a free-form label like "bodyweight".
///
/// Producers send both `45` and `"45"`; both count as loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Weight {
    Load(f64),
    Other(String),
}

impl Weight {
    pub fn as_load(&self) -> Option<f64> {
        match self {
            Weight::Load(w) => Some(*w),
            Weight::Other(s) => s.trim().parse().ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_accepts_numbers_and_numeric_strings() {
        let w: Weight = serde_json::from_str("45").unwrap();
        assert_eq!(w.as_load(), Some(45.0));

        let w: Weight = serde_json::from_str("\"45\"").unwrap();
        assert_eq!(w.as_load(), Some(45.0));

        let w: Weight = serde_json::from_str("\"bodyweight\"").unwrap();
        assert_eq!(w.as_load(), None);
    }

    #[test]
    fn exercise_volume_multiplies_out() {
        let ex = Exercise {
            name: "Squats".to_string(),
            weight: Weight::Load(45.0),
            sets: 3,
            reps: 10,
        };
        assert_eq!(ex.volume(), Some(1350.0));
    }

    #[test]
    fn bodyweight_exercise_has_no_volume() {
        let ex = Exercise {
            name: "Push Ups".to_string(),
            weight: Weight::Other("bodyweight".to_string()),
            sets: 3,
            reps: 10,
        };
        assert_eq!(ex.volume(), None);
    }

    #[test]
    fn workout_with_bad_start_time_is_detectable() {
        let w = Workout {
            start_time: "yesterday-ish".to_string(),
            end_time: None,
            notes: None,
            exercises: vec![],
        };
        assert!(w.started_at().is_none());
    }

    #[test]
    fn workout_deserializes_with_missing_optionals() {
        let w: Workout =
            serde_json::from_str(r#"{"start_time": "2024-01-15 07:30"}"#).unwrap();
        assert!(w.started_at().is_some());
        assert!(w.exercises.is_empty());
    }
}
