//! Abstraction seams: stores and clock.
//!
//! Everything the services share goes through these traits, so backends can
//! be swapped (files in production, memory in tests) without touching the
//! pollers or handlers.

mod clock;
mod journal;
mod slot;

pub use clock::Clock;
pub use journal::Journal;
pub use slot::SlotStore;
