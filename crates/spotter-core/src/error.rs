//! Error types for the messaging layer.
//!
//! Two layers, matching the propagation policy:
//! - `StoreError`: raised by slot/journal backends. Transient IO is
//!   indistinguishable from "no job present" for consumers.
//! - `HandlerError`: returned by job handlers and logged at the poller
//!   boundary. No handler error ever escapes the loop.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing file could not be read or written right now (missing,
    /// permission race with a concurrent process). Consumers treat this as
    /// "no job present" and retry on the next tick.
    #[error("transient io on {path}: {source}")]
    Transient {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The storage directory could not be created. Raised at store
    /// construction only; the process should exit rather than retry.
    #[error("cannot prepare storage directory {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Typed handler failure, inspectable in tests.
///
/// The poller logs these and keeps running; a failed job is dropped, not
/// retried. The producer sees a missing result, same as "not yet processed".
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The job payload did not have the shape the handler requires.
    #[error("malformed job payload: {0}")]
    Malformed(String),

    /// The payload decoded but a field failed domain validation
    /// (e.g. an unparseable streak date).
    #[error("domain validation failed: {0}")]
    Validation(String),

    /// A downstream store refused the write.
    #[error(transparent)]
    Store(#[from] StoreError),
}
