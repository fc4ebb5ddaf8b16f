//! Slot port: a single-item, named mailbox.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreError;

/// A named location holding at most one pending job.
///
/// This is the seam for swapping backends; `FileSlotStore` is the durable
/// implementation, `MemorySlotStore` backs tests.
///
/// Semantics callers must not forget:
/// - `publish` is last-write-wins. A second publish before consumption
///   silently replaces the first; there is no queueing per slot.
/// - `try_consume` is best-effort exactly-once: the read and the removal are
///   not atomic with respect to crashes or a racing publish.
#[async_trait]
pub trait SlotStore: Send + Sync {
    /// Store `payload` under `slot`, unconditionally replacing any
    /// unconsumed prior value. A concurrent reader never observes a
    /// partially written value.
    async fn publish(&self, slot: &str, payload: &Value) -> Result<(), StoreError>;

    /// Take the pending job, removing it from the slot. `None` when the
    /// slot is empty or its contents were malformed (logged and discarded).
    async fn try_consume(&self, slot: &str) -> Result<Option<Value>, StoreError>;

    /// Non-destructive read, used by the producer to fetch results.
    async fn peek(&self, slot: &str) -> Result<Option<Value>, StoreError>;
}
