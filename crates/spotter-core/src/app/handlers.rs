//! The four service handlers, one per input channel.
//!
//! Each decodes its job payload with documented defaults (`user_id` falls
//! back to `default_user`, `content` to empty) and applies one piece of
//! domain logic. They share nothing with each other except the slot store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use super::poller::JobHandler;
use crate::domain::{channel, Notification, SocialPost, Workout, DEFAULT_USER};
use crate::engine::streak::{StreakEngine, DATE_FORMAT};
use crate::engine::stats::aggregate;
use crate::error::HandlerError;
use crate::ports::{Clock, Journal, SlotStore};

fn default_user() -> String {
    DEFAULT_USER.to_string()
}

fn decode<T: serde::de::DeserializeOwned>(payload: Value) -> Result<T, HandlerError> {
    serde_json::from_value(payload).map_err(|e| HandlerError::Malformed(e.to_string()))
}

// --- notification ---------------------------------------------------------

#[derive(Debug, Deserialize)]
struct NotificationJob {
    #[serde(default = "default_user")]
    user_id: String,
}

pub struct NotificationHandler {
    journal: Arc<dyn Journal<Notification>>,
    clock: Arc<dyn Clock>,
}

impl NotificationHandler {
    pub fn new(journal: Arc<dyn Journal<Notification>>, clock: Arc<dyn Clock>) -> Self {
        Self { journal, clock }
    }
}

#[async_trait]
impl JobHandler for NotificationHandler {
    fn slot(&self) -> &'static str {
        channel::NOTIFICATION_INPUT
    }

    async fn handle(&self, payload: Value) -> Result<(), HandlerError> {
        let job: NotificationJob = decode(payload)?;
        let entry = Notification::workout_completed(&job.user_id, self.clock.now());
        info!(user_id = %entry.user_id, "notification created");
        self.journal.append(entry).await?;
        Ok(())
    }
}

// --- social ---------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SocialJob {
    #[serde(default = "default_user")]
    user_id: String,
    #[serde(default)]
    content: String,
}

pub struct SocialHandler {
    journal: Arc<dyn Journal<SocialPost>>,
    clock: Arc<dyn Clock>,
}

impl SocialHandler {
    pub fn new(journal: Arc<dyn Journal<SocialPost>>, clock: Arc<dyn Clock>) -> Self {
        Self { journal, clock }
    }
}

#[async_trait]
impl JobHandler for SocialHandler {
    fn slot(&self) -> &'static str {
        channel::SOCIAL_INPUT
    }

    async fn handle(&self, payload: Value) -> Result<(), HandlerError> {
        let job: SocialJob = decode(payload)?;
        let entry = SocialPost::new(&job.user_id, &job.content, self.clock.now());
        info!(user_id = %entry.user_id, "social post added");
        self.journal.append(entry).await?;
        Ok(())
    }
}

// --- progress -------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ProgressJob {
    #[serde(default)]
    workouts: Vec<Value>,
    /// Sent by the producer alongside the history; not used by the stats.
    #[serde(default)]
    #[allow(dead_code)]
    current_workout: Option<Value>,
}

pub struct ProgressHandler {
    slots: Arc<dyn SlotStore>,
    clock: Arc<dyn Clock>,
}

impl ProgressHandler {
    pub fn new(slots: Arc<dyn SlotStore>, clock: Arc<dyn Clock>) -> Self {
        Self { slots, clock }
    }
}

#[async_trait]
impl JobHandler for ProgressHandler {
    fn slot(&self) -> &'static str {
        channel::PROGRESS_INPUT
    }

    async fn handle(&self, payload: Value) -> Result<(), HandlerError> {
        let job: ProgressJob = decode(payload)?;

        // Decode records one by one so a single bad entry cannot abort the
        // batch; it is logged and dropped instead.
        let mut workouts: Vec<Workout> = Vec::with_capacity(job.workouts.len());
        for raw in job.workouts {
            match serde_json::from_value(raw) {
                Ok(w) => workouts.push(w),
                Err(e) => warn!(error = %e, "skipping undecodable workout record"),
            }
        }

        let stats = aggregate(&workouts, self.clock.now());
        info!(
            total = stats.total_workouts,
            volume = stats.total_volume,
            "progress stats computed"
        );

        let value = serde_json::to_value(&stats)
            .map_err(|e| HandlerError::Malformed(e.to_string()))?;
        self.slots.publish(channel::PROGRESS_OUTPUT, &value).await?;
        Ok(())
    }
}

// --- streak ---------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct StreakJob {
    date: String,
}

pub struct StreakHandler {
    engine: Arc<StreakEngine>,
    clock: Arc<dyn Clock>,
}

impl StreakHandler {
    pub fn new(engine: Arc<StreakEngine>, clock: Arc<dyn Clock>) -> Self {
        Self { engine, clock }
    }
}

#[async_trait]
impl JobHandler for StreakHandler {
    fn slot(&self) -> &'static str {
        channel::STREAK_INPUT
    }

    async fn handle(&self, payload: Value) -> Result<(), HandlerError> {
        let job: StreakJob = decode(payload)?;
        let date = NaiveDate::parse_from_str(job.date.trim(), DATE_FORMAT)
            .map_err(|e| HandlerError::Validation(format!("bad date {:?}: {e}", job.date)))?;
        // A backdated entry resets the streak, but a date beyond today is
        // rejected outright: it would pre-credit workouts not yet done.
        let today = self.clock.now().date();
        if date > today {
            return Err(HandlerError::Validation(format!(
                "date {:?} is in the future",
                job.date
            )));
        }
        self.engine.record(date).await?;
        Ok(())
    }
}
