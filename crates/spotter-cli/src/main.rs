//! spotter — run the worker services or poke the channels from the shell.
//!
//! `serve` is the long-running side: one poller per input slot, graceful
//! shutdown on ctrl-c. Everything else is the producer/reader surface the
//! web shell would otherwise call as a library.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use spotter_core::domain::{channel, EntryId};
use spotter_core::engine::DATE_FORMAT;
use spotter_core::ports::{Journal, SlotStore};
use spotter_core::{Config, Services};

#[derive(Parser)]
#[command(name = "spotter", about = "File-backed messaging layer for a workout tracker")]
struct Cli {
    /// Directory holding the channel files.
    #[arg(long, default_value = "data", global = true)]
    data_dir: PathBuf,

    /// Poll interval for the worker loops, in milliseconds.
    #[arg(long, default_value_t = 1000, global = true)]
    interval_ms: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all four service pollers until interrupted.
    Serve,

    /// Producer helper: fan out one completed workout to every channel.
    CompleteWorkout {
        #[arg(long)]
        user: String,
        /// Workout date, MM-DD-YYYY.
        #[arg(long)]
        date: String,
        /// Social post content; omitted means no post.
        #[arg(long)]
        content: Option<String>,
        /// JSON file with the full workout history for the progress stats.
        #[arg(long)]
        history: Option<PathBuf>,
    },

    /// Publish a social post job.
    Post {
        #[arg(long)]
        user: String,
        #[arg(long)]
        content: String,
    },

    /// Publish a notification job.
    Notify {
        #[arg(long)]
        user: String,
    },

    /// Peek the current streak.
    Streak,

    /// Peek the latest progress stats.
    Progress,

    /// Read the social feed, newest first.
    Feed,

    /// Read the notification log, newest first.
    Notifications,

    /// Mark one notification as read.
    MarkRead {
        /// Entry id as printed by `notifications`.
        id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let config = Config {
        data_dir: cli.data_dir,
        poll_interval: Duration::from_millis(cli.interval_ms),
    };
    let services = Services::open(&config)
        .await
        .context("cannot open data directory")?;
    let slots: Arc<dyn SlotStore> = services.slots.clone();

    match cli.command {
        Command::Serve => {
            info!(data_dir = %config.data_dir.display(), "starting service pollers");
            let group = services.spawn_pollers(&config);
            tokio::signal::ctrl_c().await.context("waiting for ctrl-c")?;
            info!("shutting down");
            group.shutdown_and_join().await;
        }

        Command::CompleteWorkout {
            user,
            date,
            content,
            history,
        } => {
            // Fail fast on a bad date; the streak service would only drop it
            // server-side with no signal back to the producer.
            chrono::NaiveDate::parse_from_str(&date, DATE_FORMAT)
                .with_context(|| format!("date {date:?} is not MM-DD-YYYY"))?;

            // Independent channels: each publish stands alone and may be
            // picked up in any order.
            slots
                .publish(channel::NOTIFICATION_INPUT, &json!({"user_id": user}))
                .await?;
            slots
                .publish(channel::STREAK_INPUT, &json!({"date": date}))
                .await?;
            if let Some(content) = content {
                slots
                    .publish(
                        channel::SOCIAL_INPUT,
                        &json!({"user_id": user, "content": content}),
                    )
                    .await?;
            }
            if let Some(path) = history {
                let raw = std::fs::read_to_string(&path)
                    .with_context(|| format!("cannot read {}", path.display()))?;
                let workouts: serde_json::Value =
                    serde_json::from_str(&raw).context("history is not valid JSON")?;
                slots
                    .publish(channel::PROGRESS_INPUT, &json!({"workouts": workouts}))
                    .await?;
            }
            println!("workout published for {user} on {date}");
        }

        Command::Post { user, content } => {
            slots
                .publish(
                    channel::SOCIAL_INPUT,
                    &json!({"user_id": user, "content": content}),
                )
                .await?;
            println!("post published");
        }

        Command::Notify { user } => {
            slots
                .publish(channel::NOTIFICATION_INPUT, &json!({"user_id": user}))
                .await?;
            println!("notification published");
        }

        Command::Streak => match slots.peek(channel::STREAK_OUTPUT).await? {
            Some(value) => println!("current streak: {value} days"),
            None => println!("no streak recorded yet"),
        },

        Command::Progress => match slots.peek(channel::PROGRESS_OUTPUT).await? {
            Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
            None => println!("no progress stats yet"),
        },

        Command::Feed => {
            for post in services.posts.read_all().await? {
                println!("[{}] {}: {}", post.timestamp, post.user_id, post.content);
            }
        }

        Command::Notifications => {
            for n in services.notifications.read_all().await? {
                let marker = if n.read { " " } else { "*" };
                println!(
                    "{marker} {} [{}] {}: {}",
                    n.id, n.timestamp, n.user_id, n.message
                );
            }
        }

        Command::MarkRead { id } => {
            let id: EntryId = id
                .parse()
                .map_err(|e| anyhow::anyhow!("bad entry id {id:?}: {e}"))?;
            if services.notifications.mark_read(&id).await? {
                println!("marked {id} read");
            } else {
                println!("no notification with id {id}");
            }
        }
    }

    Ok(())
}
