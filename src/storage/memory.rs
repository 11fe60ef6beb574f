//! In-memory file system
//!
//! Clones share the same files, so a test can hand one clone to the store and
//! inspect the raw log lines through another.

use std::collections::HashMap;
use std::io::{self, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use super::FileSystem;

type Files = Arc<Mutex<HashMap<PathBuf, Vec<u8>>>>;

#[derive(Debug, Clone, Default)]
pub struct InMemoryFileSystem {
    files: Files,
}

impl InMemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw bytes of a file, if it exists
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.files.lock().get(path.as_ref()).cloned()
    }

    /// Non-empty lines of a file; empty when the file does not exist
    pub fn lines(&self, path: impl AsRef<Path>) -> Vec<String> {
        self.contents(path)
            .map(|bytes| {
                String::from_utf8_lossy(&bytes)
                    .lines()
                    .filter(|line| !line.trim().is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Append raw bytes directly, bypassing any codec
    pub fn append_raw(&self, path: impl AsRef<Path>, bytes: &[u8]) {
        self.files
            .lock()
            .entry(path.as_ref().to_path_buf())
            .or_default()
            .extend_from_slice(bytes);
    }

    /// All paths that exist, sorted
    pub fn paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<_> = self.files.lock().keys().cloned().collect();
        paths.sort();
        paths
    }
}

/// Buffers writes and publishes them to the shared map on flush
struct MemoryAppender {
    files: Files,
    path: PathBuf,
    pending: Vec<u8>,
}

impl Write for MemoryAppender {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let mut files = self.files.lock();
        files
            .entry(self.path.clone())
            .or_default()
            .append(&mut self.pending);
        Ok(())
    }
}

impl FileSystem for InMemoryFileSystem {
    fn file_exists(&self, path: &Path) -> bool {
        self.files.lock().contains_key(path)
    }

    fn append_to(&self, path: &Path) -> io::Result<Box<dyn Write + Send>> {
        self.files.lock().entry(path.to_path_buf()).or_default();

        Ok(Box::new(MemoryAppender {
            files: Arc::clone(&self.files),
            path: path.to_path_buf(),
            pending: Vec::new(),
        }))
    }

    fn read_file(&self, path: &Path) -> io::Result<Box<dyn Read + Send>> {
        let bytes = self.contents(path).ok_or_else(|| not_found(path))?;
        Ok(Box::new(Cursor::new(bytes)))
    }

    fn file_len(&self, path: &Path) -> io::Result<u64> {
        self.files
            .lock()
            .get(path)
            .map(|bytes| bytes.len() as u64)
            .ok_or_else(|| not_found(path))
    }

    fn truncate(&self, path: &Path, len: u64) -> io::Result<()> {
        let mut files = self.files.lock();
        let bytes = files.get_mut(path).ok_or_else(|| not_found(path))?;
        bytes.truncate(len as usize);
        Ok(())
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("{} does not exist", path.display()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_visible_only_after_flush() {
        let fs = InMemoryFileSystem::new();
        let path = Path::new("store/stream.events.json");

        let mut handle = fs.append_to(path).unwrap();
        handle.write_all(b"first\n").unwrap();

        assert!(fs.file_exists(path));
        assert_eq!(fs.contents(path), Some(Vec::new()));

        handle.flush().unwrap();
        assert_eq!(fs.lines(path), vec!["first".to_string()]);
    }

    #[test]
    fn test_unflushed_writes_are_dropped() {
        let fs = InMemoryFileSystem::new();
        let path = Path::new("log");

        {
            let mut handle = fs.append_to(path).unwrap();
            handle.write_all(b"lost\n").unwrap();
        }

        assert!(fs.lines(path).is_empty());
    }

    #[test]
    fn test_clones_share_files() {
        let fs = InMemoryFileSystem::new();
        let other = fs.clone();

        other.append_raw("a.json", b"{}\n");

        assert!(fs.file_exists(Path::new("a.json")));
        assert_eq!(fs.paths(), vec![PathBuf::from("a.json")]);
    }

    #[test]
    fn test_truncate_keeps_prefix() {
        let fs = InMemoryFileSystem::new();
        let path = Path::new("log");
        fs.append_raw(path, b"one\ntw");

        assert_eq!(fs.file_len(path).unwrap(), 6);
        fs.truncate(path, 4).unwrap();
        assert_eq!(fs.contents(path), Some(b"one\n".to_vec()));
        assert!(fs.truncate(Path::new("missing"), 0).is_err());
    }

    #[test]
    fn test_read_missing_file_is_not_found() {
        let fs = InMemoryFileSystem::new();
        let err = fs.read_file(Path::new("missing")).err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
