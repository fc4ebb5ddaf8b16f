//! Consecutive-day streak engine.
//!
//! A sequential state machine over `(last_date, current_streak)`.
//! Transition on date `d`, relative to the stored `last_date`:
//! - no stored date: streak := 1
//! - d is the next day: streak += 1
//! - d is the same day: unchanged (re-submitting a day is idempotent)
//! - anything else: streak := 1
//! Then last_date := d.
//!
//! The "anything else" arm covers gaps *and* dates earlier than `last_date`.
//! A backdated entry resets the streak rather than being rejected; that is
//! the product behavior and is preserved on purpose.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::domain::channel;
use crate::error::{HandlerError, StoreError};
use crate::impls::write_atomic;
use crate::ports::SlotStore;

/// Date format for streak events and the persisted date file ("01-15-2024").
pub const DATE_FORMAT: &str = "%m-%d-%Y";

const DATE_FILE: &str = "streak-date";
const COUNT_FILE: &str = "streak-count";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreakState {
    pub last_date: Option<NaiveDate>,
    pub current_streak: u32,
}

impl StreakState {
    /// Apply one date event and return the resulting streak.
    pub fn observe(&mut self, date: NaiveDate) -> u32 {
        match self.last_date {
            None => self.current_streak = 1,
            Some(last) => {
                let diff = (date - last).num_days();
                if diff == 1 {
                    self.current_streak += 1;
                } else if diff != 0 {
                    // Gap, or an earlier date. Both reset.
                    self.current_streak = 1;
                }
            }
        }
        self.last_date = Some(date);
        self.current_streak
    }
}

/// The engine couples the state machine to its persistence: the last date
/// and the streak count each in a small text file. Persisting happens
/// before the new value is published (write-then-ack), so a crash in
/// between re-delivers an event that is idempotent for the same date.
///
/// The published `streak-output` slot is a copy for readers, not the
/// source of truth; a reader that consumes it instead of peeking cannot
/// lose the count.
pub struct StreakEngine {
    state: Mutex<StreakState>,
    date_path: PathBuf,
    count_path: PathBuf,
    slots: Arc<dyn SlotStore>,
}

impl StreakEngine {
    /// Load persisted state and resume. An unreadable or unparseable date
    /// file means "no previous workout", exactly like a first run.
    pub async fn load(
        state_dir: impl Into<PathBuf>,
        slots: Arc<dyn SlotStore>,
    ) -> Result<Self, StoreError> {
        let state_dir = state_dir.into();
        fs::create_dir_all(&state_dir).map_err(|source| StoreError::Config {
            path: state_dir.clone(),
            source,
        })?;
        let date_path = state_dir.join(DATE_FILE);
        let count_path = state_dir.join(COUNT_FILE);

        let last_date = match fs::read_to_string(&date_path) {
            Ok(raw) => match NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT) {
                Ok(date) => Some(date),
                Err(e) => {
                    warn!(error = %e, "stored streak date unparseable, starting fresh");
                    None
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(error = %e, "stored streak date unreadable, starting fresh");
                None
            }
        };

        let current_streak = match fs::read_to_string(&count_path) {
            Ok(raw) => match raw.trim().parse() {
                Ok(count) => count,
                Err(e) => {
                    warn!(error = %e, "stored streak count unparseable, starting fresh");
                    0
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
            Err(e) => {
                warn!(error = %e, "stored streak count unreadable, starting fresh");
                0
            }
        };

        Ok(Self {
            state: Mutex::new(StreakState {
                last_date,
                current_streak,
            }),
            date_path,
            count_path,
            slots,
        })
    }

    /// Process one date event: transition, persist, publish. Returns the
    /// new streak.
    pub async fn record(&self, date: NaiveDate) -> Result<u32, HandlerError> {
        let mut state = self.state.lock().await;
        let streak = state.observe(date);

        let formatted = date.format(DATE_FORMAT).to_string();
        write_atomic(&self.date_path, formatted.as_bytes()).map_err(|source| {
            StoreError::Transient {
                path: self.date_path.clone(),
                source,
            }
        })?;
        write_atomic(&self.count_path, streak.to_string().as_bytes()).map_err(|source| {
            StoreError::Transient {
                path: self.count_path.clone(),
                source,
            }
        })?;

        self.slots
            .publish(channel::STREAK_OUTPUT, &serde_json::json!(streak))
            .await?;

        info!(date = %formatted, streak, "streak updated");
        Ok(streak)
    }

    #[cfg(test)]
    pub(crate) async fn state(&self) -> StreakState {
        *self.state.lock().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::{FileSlotStore, MemorySlotStore};
    use rstest::rstest;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn first_event_starts_at_one() {
        let mut state = StreakState::default();
        assert_eq!(state.observe(date("01-01-2024")), 1);
        assert_eq!(state.last_date, Some(date("01-01-2024")));
    }

    #[test]
    fn consecutive_days_count_up() {
        let mut state = StreakState::default();
        for (i, d) in ["01-01-2024", "01-02-2024", "01-03-2024", "01-04-2024"]
            .iter()
            .enumerate()
        {
            assert_eq!(state.observe(date(d)), i as u32 + 1);
        }
    }

    #[test]
    fn same_day_is_idempotent() {
        let mut state = StreakState::default();
        state.observe(date("01-01-2024"));
        state.observe(date("01-02-2024"));
        assert_eq!(state.observe(date("01-02-2024")), 2);
        assert_eq!(state.observe(date("01-02-2024")), 2);
    }

    #[rstest]
    #[case::gap("01-10-2024")]
    #[case::earlier_date("12-25-2023")]
    fn gap_or_backdated_entry_resets(#[case] next: &str) {
        let mut state = StreakState::default();
        state.observe(date("01-01-2024"));
        state.observe(date("01-02-2024"));

        assert_eq!(state.observe(date(next)), 1);
        // last_date follows the event even when it moved backwards.
        assert_eq!(state.last_date, Some(date(next)));
    }

    #[test]
    fn worked_example_from_the_product() {
        let mut state = StreakState::default();
        let streaks: Vec<u32> = ["01-01-2024", "01-02-2024", "01-03-2024", "01-10-2024"]
            .iter()
            .map(|d| state.observe(date(d)))
            .collect();
        assert_eq!(streaks, vec![1, 2, 3, 1]);
    }

    #[tokio::test]
    async fn record_persists_and_publishes() {
        let slots: Arc<dyn SlotStore> = Arc::new(MemorySlotStore::new());
        let dir = tempfile::tempdir().unwrap();
        let engine = StreakEngine::load(dir.path(), Arc::clone(&slots))
            .await
            .unwrap();

        engine.record(date("01-01-2024")).await.unwrap();
        engine.record(date("01-02-2024")).await.unwrap();

        let published = slots.peek(channel::STREAK_OUTPUT).await.unwrap();
        assert_eq!(published, Some(serde_json::json!(2)));

        let stored = fs::read_to_string(dir.path().join(DATE_FILE)).unwrap();
        assert_eq!(stored, "01-02-2024");
        let count = fs::read_to_string(dir.path().join(COUNT_FILE)).unwrap();
        assert_eq!(count, "2");
    }

    #[tokio::test]
    async fn consuming_the_output_slot_does_not_lose_state() {
        let dir = tempfile::tempdir().unwrap();
        let slots: Arc<dyn SlotStore> =
            Arc::new(FileSlotStore::open(dir.path().join("slots")).unwrap());

        {
            let engine = StreakEngine::load(dir.path(), Arc::clone(&slots))
                .await
                .unwrap();
            engine.record(date("01-01-2024")).await.unwrap();
            engine.record(date("01-02-2024")).await.unwrap();
        }

        // A reader empties the output slot; the count files still hold the
        // state, so the next day keeps counting.
        slots.try_consume(channel::STREAK_OUTPUT).await.unwrap();
        let engine = StreakEngine::load(dir.path(), Arc::clone(&slots))
            .await
            .unwrap();
        assert_eq!(engine.record(date("01-03-2024")).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn restart_resumes_where_it_left_off() {
        let dir = tempfile::tempdir().unwrap();
        let slots: Arc<dyn SlotStore> =
            Arc::new(FileSlotStore::open(dir.path().join("slots")).unwrap());

        {
            let engine = StreakEngine::load(dir.path(), Arc::clone(&slots))
                .await
                .unwrap();
            engine.record(date("01-01-2024")).await.unwrap();
            engine.record(date("01-02-2024")).await.unwrap();
        }

        // New engine, same files: the next day continues the streak.
        let engine = StreakEngine::load(dir.path(), Arc::clone(&slots))
            .await
            .unwrap();
        assert_eq!(
            engine.state().await,
            StreakState {
                last_date: Some(date("01-02-2024")),
                current_streak: 2,
            }
        );
        assert_eq!(engine.record(date("01-03-2024")).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn corrupt_date_file_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(DATE_FILE), "not a date").unwrap();
        fs::write(dir.path().join(COUNT_FILE), "many").unwrap();

        let slots: Arc<dyn SlotStore> = Arc::new(MemorySlotStore::new());
        let engine = StreakEngine::load(dir.path(), slots).await.unwrap();
        assert_eq!(engine.state().await.last_date, None);
        assert_eq!(engine.record(date("01-05-2024")).await.unwrap(), 1);
    }
}
