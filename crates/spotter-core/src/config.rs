//! Runtime configuration.

use std::path::PathBuf;
use std::time::Duration;

use crate::app::poller::DEFAULT_POLL_INTERVAL;

/// Where the channel files live and how often the pollers tick.
///
/// The CLI owns flag parsing; this stays a plain struct so library users and
/// tests can build one directly.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub poll_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}
