//! Record Store - line-delimited JSON append/scan over one file
//!
//! Every record is one JSON document on its own line. Appends encode the
//! whole batch before touching storage and hand it over in a single write,
//! so an encoding failure never leaves half a batch behind. When the write
//! itself fails the log is cut back to its previous length, so a torn line
//! never swallows the next append. Scans are lazy:
//! lines are read and decoded one at a time while the iterator is driven.

use std::io::{BufRead, BufReader, ErrorKind, Lines, Read, Write};
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{StoreError, StoreResult};
use crate::storage::FileSystem;

/// Append/scan primitive shared by readers and writers
#[derive(Debug, Clone)]
pub struct RecordStore {
    fs: Arc<dyn FileSystem>,
}

impl RecordStore {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Append `records` to `path` in order, one line each
    ///
    /// Returns the number of records written. An empty batch does not touch
    /// storage. Concurrent appends to the same path are not serialized.
    pub fn append<T: Serialize>(&self, path: &Path, records: &[T]) -> StoreResult<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut batch = String::new();
        for record in records {
            let line = serde_json::to_string(record).map_err(|e| StoreError::encode(path, e))?;
            batch.push_str(&line);
            batch.push('\n');
        }

        let start = self.current_len(path)?;
        let mut handle = self
            .fs
            .append_to(path)
            .map_err(|e| StoreError::io("opening for append", path, e))?;

        let written = match handle.write_all(batch.as_bytes()) {
            Ok(()) => handle.flush().map_err(|e| ("flushing", e)),
            Err(e) => Err(("appending to", e)),
        };
        drop(handle);

        if let Err((operation, e)) = written {
            self.roll_back(path, start);
            return Err(StoreError::io(operation, path, e));
        }

        tracing::debug!(
            path = %path.display(),
            records = records.len(),
            bytes = batch.len(),
            "appended records"
        );

        Ok(records.len())
    }

    fn current_len(&self, path: &Path) -> StoreResult<u64> {
        if !self.fs.file_exists(path) {
            return Ok(0);
        }

        match self.fs.file_len(path) {
            Ok(len) => Ok(len),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(0),
            Err(e) => Err(StoreError::io("measuring", path, e)),
        }
    }

    /// Cut a failed batch off the log so the next append starts on a fresh line
    fn roll_back(&self, path: &Path, len: u64) {
        match self.fs.truncate(path, len) {
            Ok(()) => tracing::warn!(
                path = %path.display(),
                len,
                "append failed, log rolled back"
            ),
            Err(e) => tracing::error!(
                path = %path.display(),
                len,
                error = %e,
                "append failed and the log could not be rolled back"
            ),
        }
    }

    /// Lazily decode every record of `path` in storage order
    ///
    /// A missing file yields an empty iterator. Each call starts from the
    /// beginning of the file.
    pub fn scan<T: DeserializeOwned>(&self, path: &Path) -> StoreResult<RecordIter<T>> {
        if !self.fs.file_exists(path) {
            tracing::debug!(path = %path.display(), "log does not exist, nothing to scan");
            return Ok(RecordIter::empty(path));
        }

        match self.fs.read_file(path) {
            Ok(reader) => Ok(RecordIter::new(path, reader)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(RecordIter::empty(path)),
            Err(e) => Err(StoreError::io("opening", path, e)),
        }
    }
}

/// Lazy iterator over the records of one file
///
/// Stops for good after the first read or decode error.
pub struct RecordIter<T> {
    path: PathBuf,
    lines: Option<Lines<BufReader<Box<dyn Read + Send>>>>,
    line: usize,
    decoded: usize,
    _record: PhantomData<fn() -> T>,
}

impl<T> RecordIter<T> {
    fn new(path: &Path, reader: Box<dyn Read + Send>) -> Self {
        Self {
            path: path.to_path_buf(),
            lines: Some(BufReader::new(reader).lines()),
            line: 0,
            decoded: 0,
            _record: PhantomData,
        }
    }

    fn empty(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            lines: None,
            line: 0,
            decoded: 0,
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn fail(&mut self, error: StoreError) -> Option<StoreResult<T>> {
        self.lines = None;
        Some(Err(error))
    }
}

impl<T: DeserializeOwned> Iterator for RecordIter<T> {
    type Item = StoreResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let next = self.lines.as_mut()?.next();
            let text = match next {
                None => {
                    tracing::trace!(
                        path = %self.path.display(),
                        records = self.decoded,
                        "scan finished"
                    );
                    self.lines = None;
                    return None;
                }
                Some(Err(e)) if e.kind() == ErrorKind::InvalidData => {
                    self.line += 1;
                    let error = StoreError::invalid_text(&self.path, self.line, e);
                    return self.fail(error);
                }
                Some(Err(e)) => {
                    let error = StoreError::io("reading", &self.path, e);
                    return self.fail(error);
                }
                Some(Ok(text)) => text,
            };

            self.line += 1;
            if text.trim().is_empty() {
                continue;
            }

            return match serde_json::from_str(&text) {
                Ok(record) => {
                    self.decoded += 1;
                    Some(Ok(record))
                }
                Err(e) => {
                    let error = StoreError::decode(&self.path, self.line, e);
                    self.fail(error)
                }
            };
        }
    }
}

impl<T: DeserializeOwned> FusedIterator for RecordIter<T> {}

impl<T> std::fmt::Debug for RecordIter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordIter")
            .field("path", &self.path)
            .field("line", &self.line)
            .field("exhausted", &self.lines.is_none())
            .finish()
    }
}
