//! spotter-core
//!
//! File-backed messaging layer for a workout tracker. Independent worker
//! processes poll well-known input slots, apply one piece of domain logic,
//! and publish results to output slots or append-logs; the producer (the web
//! shell) only ever writes jobs and reads results.
//!
//! # Module map
//! - **domain**: workouts, feed entries, channel names
//! - **ports**: abstraction seams (SlotStore, Journal, Clock)
//! - **impls**: file-backed and in-memory backends
//! - **engine**: streak state machine, progress aggregation
//! - **app**: poller loops, the four service handlers, wiring
//!
//! # Delivery semantics
//! A slot holds at most one pending job; publish is last-write-wins and a
//! producer that writes twice before a consumer ticks loses the first job.
//! Consumption is best-effort at-most-once. There is no ordering or
//! transactional coupling across slots.

pub mod app;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod impls;
pub mod ports;

pub use app::{JobHandler, PollerGroup, Services, DEFAULT_POLL_INTERVAL};
pub use config::Config;
pub use error::{HandlerError, StoreError};
