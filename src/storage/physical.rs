//! File system backed by `std::fs`

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;

use super::FileSystem;

/// Real files on disk
#[derive(Debug, Clone)]
pub struct PhysicalFileSystem {
    /// Call `sync_all` when an append handle is flushed
    sync_on_flush: bool,
}

impl PhysicalFileSystem {
    pub fn new() -> Self {
        Self {
            sync_on_flush: true,
        }
    }

    pub fn with_sync(sync_on_flush: bool) -> Self {
        Self { sync_on_flush }
    }
}

impl Default for PhysicalFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Append handle that optionally syncs to disk on flush
struct AppendFile {
    file: File,
    sync_on_flush: bool,
}

impl Write for AppendFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.file.write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()?;
        if self.sync_on_flush {
            self.file.sync_all()?;
        }
        Ok(())
    }
}

impl FileSystem for PhysicalFileSystem {
    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn append_to(&self, path: &Path) -> io::Result<Box<dyn Write + Send>> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Box::new(AppendFile {
            file,
            sync_on_flush: self.sync_on_flush,
        }))
    }

    fn read_file(&self, path: &Path) -> io::Result<Box<dyn Read + Send>> {
        Ok(Box::new(File::open(path)?))
    }

    fn file_len(&self, path: &Path) -> io::Result<u64> {
        Ok(fs::metadata(path)?.len())
    }

    fn truncate(&self, path: &Path, len: u64) -> io::Result<()> {
        let file = OpenOptions::new().write(true).open(path)?;
        file.set_len(len)?;
        if self.sync_on_flush {
            file.sync_all()?;
        }
        Ok(())
    }
}
