//! Backend implementations for the ports.
//!
//! - `FileSlotStore` / `FileJournal`: durable, one file per slot/log.
//! - `MemorySlotStore`: for tests and embedded use.
//! - `SystemClock` / `FixedClock`: real and pinned time.

mod clock;
mod fs_journal;
mod fs_slot;
mod memory;

pub use clock::{FixedClock, SystemClock};
pub use fs_journal::FileJournal;
pub use fs_slot::FileSlotStore;
pub use memory::MemorySlotStore;

use std::fs;
use std::io;
use std::path::Path;

use ulid::Ulid;

/// Write-to-temp-then-rename. The rename is atomic on POSIX, so a concurrent
/// reader sees either the old document or the new one, never a torn write.
/// The temp name carries a fresh ULID so concurrent writers never share one
/// and cannot rename each other's half-written file into place.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let tmp = match (path.parent(), path.file_name()) {
        (Some(dir), Some(name)) => {
            dir.join(format!(".{}.{}.tmp", name.to_string_lossy(), Ulid::new()))
        }
        _ => return Err(io::Error::new(io::ErrorKind::InvalidInput, "invalid store path")),
    };
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)
}
