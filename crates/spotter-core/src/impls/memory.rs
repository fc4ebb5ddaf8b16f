//! In-memory slot store for tests and embedded use.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::ports::SlotStore;

/// `HashMap` behind a mutex; same last-write-wins semantics as the file
/// store, minus durability.
#[derive(Default)]
pub struct MemorySlotStore {
    slots: Mutex<HashMap<String, Value>>,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SlotStore for MemorySlotStore {
    async fn publish(&self, slot: &str, payload: &Value) -> Result<(), StoreError> {
        let mut slots = self.slots.lock().await;
        slots.insert(slot.to_string(), payload.clone());
        Ok(())
    }

    async fn try_consume(&self, slot: &str) -> Result<Option<Value>, StoreError> {
        let mut slots = self.slots.lock().await;
        Ok(slots.remove(slot))
    }

    async fn peek(&self, slot: &str) -> Result<Option<Value>, StoreError> {
        let slots = self.slots.lock().await;
        Ok(slots.get(slot).cloned())
    }
}
