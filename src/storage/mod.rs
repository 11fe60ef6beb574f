//! Storage medium behind the logs
//!
//! The store only needs three capabilities from its medium: an existence
//! check, an append handle and a read handle. [`PhysicalFileSystem`] backs
//! them with real files; [`InMemoryFileSystem`] keeps everything in a shared
//! map so tests and tools can run without touching the disk.
//!
//! Handles are scoped: they are released when dropped, on every exit path.
//! Nothing here serializes concurrent appends to the same path. Callers that
//! run more than one writer per log must lock externally.

mod memory;
mod physical;

use std::io::{self, Read, Write};
use std::path::Path;

pub use memory::InMemoryFileSystem;
pub use physical::PhysicalFileSystem;

/// Append-only byte storage addressed by path
pub trait FileSystem: Send + Sync + std::fmt::Debug {
    fn file_exists(&self, path: &Path) -> bool;

    /// Open `path` for appending, creating it when missing
    ///
    /// Written bytes are only guaranteed to be visible once the handle has
    /// been flushed.
    fn append_to(&self, path: &Path) -> io::Result<Box<dyn Write + Send>>;

    fn read_file(&self, path: &Path) -> io::Result<Box<dyn Read + Send>>;

    /// Current length of `path` in bytes, `NotFound` when missing
    fn file_len(&self, path: &Path) -> io::Result<u64>;

    /// Cut `path` back to `len` bytes, discarding a partially written tail
    fn truncate(&self, path: &Path, len: u64) -> io::Result<()>;
}
