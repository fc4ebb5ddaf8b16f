//! Clock port: time as a dependency.
//!
//! Aggregation windows and feed timestamps depend on "now"; routing that
//! through a trait lets tests pin time with `FixedClock`.

use chrono::NaiveDateTime;

pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}
