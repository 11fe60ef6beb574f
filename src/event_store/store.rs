//! Event Store - reader/writer contracts and the file-backed factory
//!
//! A [`FileEventStore`] does not hold any state besides its configuration.
//! Each `create_reader`/`create_writer` call builds an independent view of
//! the two logs that belong to a stream:
//!
//! - `<directory>/<stream>.events.json`
//! - `<directory>/<stream>.snapshots.json`

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::StoreResult;
use crate::storage::{FileSystem, PhysicalFileSystem};
use crate::types::{AggregateKey, DomainEvent, RecordedEvent, Sequence, Snapshot};

use super::context::EventStoreContext;
use super::reader::FileStoreReader;
use super::record_store::RecordStore;
use super::writer::FileStoreWriter;

/// Lazy sequence of events in storage order
///
/// Yields at most one error, after which the iterator is exhausted.
pub type EventIter<'a, K> = Box<dyn Iterator<Item = StoreResult<RecordedEvent<K>>> + 'a>;

/// Read-only queries over the logs of one stream
pub trait StoreReader<K: AggregateKey> {
    /// All events of the key in storage order
    fn load_events(&self, aggregate_id: &K) -> StoreResult<EventIter<'_, K>>;

    /// Events of the key with a sequence strictly greater than `sequence`
    ///
    /// `None` means no lower bound.
    fn load_events_since(
        &self,
        aggregate_id: &K,
        sequence: Option<Sequence>,
    ) -> StoreResult<EventIter<'_, K>>;

    fn load_latest_snapshot_for(&self, aggregate_id: &K)
        -> StoreResult<Option<Box<dyn Snapshot<K>>>>;

    /// Every distinct key that has at least one event
    fn load_all_keys(&self) -> StoreResult<HashSet<K>>;

    /// Every event of every key in storage order
    fn load_all_events(&self) -> StoreResult<EventIter<'_, K>>;
}

/// Append side of a stream
pub trait StoreWriter<K: AggregateKey> {
    /// Append a batch of events in the order given
    ///
    /// Sequence numbers are not validated. An empty batch is a no-op.
    fn save_events(&self, events: &[&dyn DomainEvent<K>]) -> StoreResult<()>;

    fn save_snapshot(&self, snapshot: &dyn Snapshot<K>) -> StoreResult<()>;

    fn get_latest_sequence_for(&self, aggregate_id: &K) -> StoreResult<Option<Sequence>>;

    /// Events stored after the latest snapshot, or all of them without one
    fn get_number_of_events_since_snapshot_for(&self, aggregate_id: &K) -> StoreResult<usize>;

    fn get_latest_snapshot_sequence_for(&self, aggregate_id: &K) -> StoreResult<Option<Sequence>>;
}

/// Factory of readers and writers bound to a stream context
pub trait EventStore {
    type Reader<K: AggregateKey>: StoreReader<K>;
    type Writer<K: AggregateKey>: StoreWriter<K>;

    fn create_reader<K: AggregateKey>(&self, context: &EventStoreContext<K>) -> Self::Reader<K>;

    fn create_writer<K: AggregateKey>(&self, context: &EventStoreContext<K>) -> Self::Writer<K>;
}

/// Configuration for the FileEventStore
#[derive(Debug, Clone)]
pub struct FileStoreConfig {
    /// Directory holding every log file
    pub directory: PathBuf,
    /// File name suffix of event logs
    pub events_suffix: String,
    /// File name suffix of snapshot logs
    pub snapshots_suffix: String,
    /// Whether each append batch is synced to disk before returning
    pub sync_on_append: bool,
}

impl Default for FileStoreConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("data"),
            events_suffix: "events.json".to_string(),
            snapshots_suffix: "snapshots.json".to_string(),
            sync_on_append: true,
        }
    }
}

impl FileStoreConfig {
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    pub fn with_events_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.events_suffix = suffix.into();
        self
    }

    pub fn with_snapshots_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.snapshots_suffix = suffix.into();
        self
    }

    pub fn with_sync_on_append(mut self, sync: bool) -> Self {
        self.sync_on_append = sync;
        self
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Get path to `<stream>.events.json`
    pub fn events_path(&self, stream: &str) -> PathBuf {
        self.directory
            .join(format!("{}.{}", stream, self.events_suffix))
    }

    /// Get path to `<stream>.snapshots.json`
    pub fn snapshots_path(&self, stream: &str) -> PathBuf {
        self.directory
            .join(format!("{}.{}", stream, self.snapshots_suffix))
    }
}

/// Event store keeping every stream in a pair of JSONL files
#[derive(Debug, Clone)]
pub struct FileEventStore {
    fs: Arc<dyn FileSystem>,
    config: FileStoreConfig,
}

impl FileEventStore {
    /// Store on the real file system rooted at `directory`
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self::with_config(FileStoreConfig::new(directory))
    }

    pub fn with_config(config: FileStoreConfig) -> Self {
        let fs = PhysicalFileSystem::with_sync(config.sync_on_append);
        Self::with_file_system(Arc::new(fs), config)
    }

    /// Store on an arbitrary medium, such as an in-memory file system
    pub fn with_file_system(fs: Arc<dyn FileSystem>, config: FileStoreConfig) -> Self {
        tracing::debug!(
            directory = %config.directory.display(),
            sync_on_append = config.sync_on_append,
            "event store configured"
        );
        Self { fs, config }
    }

    pub fn config(&self) -> &FileStoreConfig {
        &self.config
    }

    fn reader_for<K: AggregateKey>(&self, context: &EventStoreContext<K>) -> FileStoreReader<K> {
        let stream = context.stream_name();
        FileStoreReader::new(
            RecordStore::new(Arc::clone(&self.fs)),
            Arc::clone(context.registry()),
            self.config.events_path(stream),
            self.config.snapshots_path(stream),
        )
    }
}

impl EventStore for FileEventStore {
    type Reader<K: AggregateKey> = FileStoreReader<K>;
    type Writer<K: AggregateKey> = FileStoreWriter<K>;

    fn create_reader<K: AggregateKey>(&self, context: &EventStoreContext<K>) -> Self::Reader<K> {
        self.reader_for(context)
    }

    fn create_writer<K: AggregateKey>(&self, context: &EventStoreContext<K>) -> Self::Writer<K> {
        FileStoreWriter::new(self.reader_for(context))
    }
}
