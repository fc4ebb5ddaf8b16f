//! Journal port: an unbounded, newest-first append-log.

use async_trait::async_trait;

use crate::error::StoreError;

/// An ordered collection persisted as one serialized document.
///
/// New entries go to the front; there is no pagination, no eviction, and no
/// deletion. Growth is unbounded by design.
#[async_trait]
pub trait Journal<E: Send + 'static>: Send + Sync {
    /// Prepend `entry` and rewrite the whole collection.
    async fn append(&self, entry: E) -> Result<(), StoreError>;

    /// The full collection, newest first. Empty when absent or corrupt.
    async fn read_all(&self) -> Result<Vec<E>, StoreError>;
}
