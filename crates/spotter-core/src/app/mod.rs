//! Application layer: poller loops, handlers, and service wiring.

pub mod handlers;
pub mod poller;

pub use poller::{JobHandler, PollerGroup, DEFAULT_POLL_INTERVAL};

use std::sync::Arc;

use crate::config::Config;
use crate::domain::{Notification, SocialPost};
use crate::engine::StreakEngine;
use crate::error::StoreError;
use crate::impls::{FileJournal, FileSlotStore, SystemClock};
use crate::ports::SlotStore;
use handlers::{NotificationHandler, ProgressHandler, SocialHandler, StreakHandler};

/// Everything the four services share, opened from one config.
///
/// Also the producer's surface: publish into the slots, read the journals,
/// peek the output slots.
pub struct Services {
    pub slots: Arc<FileSlotStore>,
    pub notifications: Arc<FileJournal<Notification>>,
    pub posts: Arc<FileJournal<SocialPost>>,
    pub streak: Arc<StreakEngine>,
}

impl Services {
    /// Open all stores under the configured data directory, creating it on
    /// first run. A directory that cannot be created is fatal; nothing else
    /// here touches the filesystem yet.
    pub async fn open(config: &Config) -> Result<Self, StoreError> {
        let slots = Arc::new(FileSlotStore::open(&config.data_dir)?);
        let notifications = Arc::new(FileJournal::open(&config.data_dir, "notifications")?);
        let posts = Arc::new(FileJournal::open(&config.data_dir, "social-posts")?);

        let slot_port: Arc<dyn SlotStore> = slots.clone();
        let streak = Arc::new(StreakEngine::load(&config.data_dir, slot_port).await?);

        Ok(Self {
            slots,
            notifications,
            posts,
            streak,
        })
    }

    /// One handler per input channel.
    pub fn handlers(&self) -> Vec<Arc<dyn JobHandler>> {
        let clock = Arc::new(SystemClock);
        let slots: Arc<dyn SlotStore> = self.slots.clone();
        vec![
            Arc::new(NotificationHandler::new(
                self.notifications.clone(),
                clock.clone(),
            )),
            Arc::new(SocialHandler::new(self.posts.clone(), clock.clone())),
            Arc::new(ProgressHandler::new(slots, clock.clone())),
            Arc::new(StreakHandler::new(self.streak.clone(), clock)),
        ]
    }

    /// Spawn the four pollers against the shared slot store.
    pub fn spawn_pollers(&self, config: &Config) -> PollerGroup {
        let slots: Arc<dyn SlotStore> = self.slots.clone();
        PollerGroup::spawn(slots, self.handlers(), config.poll_interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::channel;
    use crate::ports::Journal;
    use serde_json::json;
    use std::time::Duration;

    fn config(dir: &tempfile::TempDir) -> Config {
        Config {
            data_dir: dir.path().join("data"),
            poll_interval: Duration::from_millis(10),
        }
    }

    #[tokio::test]
    async fn full_pipeline_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(&dir);
        let services = Services::open(&cfg).await.unwrap();
        let group = services.spawn_pollers(&cfg);

        // Producer side: one completed workout fans out to every channel.
        let slots: Arc<dyn SlotStore> = services.slots.clone();
        slots
            .publish(channel::NOTIFICATION_INPUT, &json!({"user_id": "alice"}))
            .await
            .unwrap();
        slots
            .publish(
                channel::SOCIAL_INPUT,
                &json!({"user_id": "alice", "content": "done!"}),
            )
            .await
            .unwrap();
        slots
            .publish(channel::STREAK_INPUT, &json!({"date": "01-01-2024"}))
            .await
            .unwrap();
        slots
            .publish(
                channel::PROGRESS_INPUT,
                &json!({"workouts": [], "current_workout": null}),
            )
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(200)).await;
        group.shutdown_and_join().await;

        assert_eq!(services.notifications.read_all().await.unwrap().len(), 1);
        assert_eq!(services.posts.read_all().await.unwrap().len(), 1);
        assert_eq!(
            slots.peek(channel::STREAK_OUTPUT).await.unwrap(),
            Some(json!(1))
        );
        let stats = slots.peek(channel::PROGRESS_OUTPUT).await.unwrap().unwrap();
        assert_eq!(stats["total_workouts"], 0);
    }

    #[tokio::test]
    async fn services_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(&dir);

        {
            let services = Services::open(&cfg).await.unwrap();
            services.streak.record(date("01-01-2024")).await.unwrap();
        }

        let services = Services::open(&cfg).await.unwrap();
        assert_eq!(services.streak.record(date("01-02-2024")).await.unwrap(), 2);
    }

    fn date(s: &str) -> chrono::NaiveDate {
        chrono::NaiveDate::parse_from_str(s, crate::engine::DATE_FORMAT).unwrap()
    }
}
