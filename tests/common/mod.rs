//! Shared test domain: candidates renamed by events, captured by mementos

#![allow(dead_code)]

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ledger_store::{
    DomainEvent, EventStore, EventStoreContext, FileEventStore, FileStoreReader, FileStoreWriter,
    FileSystem, InMemoryFileSystem, KeyAndAggregateNamingConvention, Sequence, Snapshot,
    TypeRegistry, TypeTagged,
};
use serde::{Deserialize, Serialize};
use tempfile::TempDir;
use uuid::Uuid;

/// Aggregate marker used for stream naming
pub struct Candidate;

/// Second aggregate type, to check streams do not collide
pub struct Ballot;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameChangedByDeedPoll {
    pub aggregate_id: Uuid,
    pub sequence: Sequence,
    pub new_name: String,
}

impl TypeTagged for NameChangedByDeedPoll {
    const TYPE_TAG: &'static str = "NameChangedByDeedPoll";
}

impl DomainEvent<Uuid> for NameChangedByDeedPoll {
    fn aggregate_id(&self) -> &Uuid {
        &self.aggregate_id
    }

    fn sequence(&self) -> Sequence {
        self.sequence
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixNameSpelling {
    pub aggregate_id: Uuid,
    pub sequence: Sequence,
    pub new_name: String,
}

impl TypeTagged for FixNameSpelling {
    const TYPE_TAG: &'static str = "FixNameSpelling";
}

impl DomainEvent<Uuid> for FixNameSpelling {
    fn aggregate_id(&self) -> &Uuid {
        &self.aggregate_id
    }

    fn sequence(&self) -> Sequence {
        self.sequence
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateMemento {
    pub aggregate_id: Uuid,
    pub sequence: Sequence,
    pub name: String,
}

impl TypeTagged for CandidateMemento {
    const TYPE_TAG: &'static str = "CandidateMemento";
}

impl Snapshot<Uuid> for CandidateMemento {
    fn aggregate_id(&self) -> &Uuid {
        &self.aggregate_id
    }

    fn sequence(&self) -> Sequence {
        self.sequence
    }
}

pub fn deed_poll(id: Uuid, sequence: u64, name: &str) -> NameChangedByDeedPoll {
    NameChangedByDeedPoll {
        aggregate_id: id,
        sequence: Sequence::new(sequence),
        new_name: name.to_string(),
    }
}

pub fn spelling(id: Uuid, sequence: u64, name: &str) -> FixNameSpelling {
    FixNameSpelling {
        aggregate_id: id,
        sequence: Sequence::new(sequence),
        new_name: name.to_string(),
    }
}

pub fn memento(id: Uuid, sequence: u64, name: &str) -> CandidateMemento {
    CandidateMemento {
        aggregate_id: id,
        sequence: Sequence::new(sequence),
        name: name.to_string(),
    }
}

pub fn registry() -> TypeRegistry<Uuid> {
    TypeRegistry::new()
        .with_event::<NameChangedByDeedPoll>()
        .with_event::<FixNameSpelling>()
        .with_snapshot::<CandidateMemento>()
}

/// A store rooted in a fresh temp directory, removed on drop
pub struct TestStore {
    pub temp_dir: TempDir,
    pub store: FileEventStore,
    pub context: EventStoreContext<Uuid>,
}

impl TestStore {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileEventStore::new(temp_dir.path());
        let context = EventStoreContext::for_aggregate::<Candidate>(
            &KeyAndAggregateNamingConvention,
            Arc::new(registry()),
        );

        Self {
            temp_dir,
            store,
            context,
        }
    }

    pub fn reader(&self) -> FileStoreReader<Uuid> {
        self.store.create_reader(&self.context)
    }

    pub fn writer(&self) -> FileStoreWriter<Uuid> {
        self.store.create_writer(&self.context)
    }
}

/// In-memory medium that can be told to tear its next append in half,
/// the way a full disk interrupts a write
#[derive(Debug, Clone, Default)]
pub struct TearingFileSystem {
    pub inner: InMemoryFileSystem,
    tear_next: Arc<AtomicBool>,
}

impl TearingFileSystem {
    pub fn tear_next_append(&self) {
        self.tear_next.store(true, Ordering::SeqCst);
    }
}

struct TornWriter {
    fs: InMemoryFileSystem,
    path: PathBuf,
}

impl Write for TornWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.fs.append_raw(&self.path, &buf[..buf.len() / 2]);
        Err(io::Error::new(io::ErrorKind::Other, "no space left on device"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl FileSystem for TearingFileSystem {
    fn file_exists(&self, path: &Path) -> bool {
        self.inner.file_exists(path)
    }

    fn append_to(&self, path: &Path) -> io::Result<Box<dyn Write + Send>> {
        let handle = self.inner.append_to(path)?;
        if !self.tear_next.swap(false, Ordering::SeqCst) {
            return Ok(handle);
        }

        Ok(Box::new(TornWriter {
            fs: self.inner.clone(),
            path: path.to_path_buf(),
        }))
    }

    fn read_file(&self, path: &Path) -> io::Result<Box<dyn Read + Send>> {
        self.inner.read_file(path)
    }

    fn file_len(&self, path: &Path) -> io::Result<u64> {
        self.inner.file_len(path)
    }

    fn truncate(&self, path: &Path, len: u64) -> io::Result<()> {
        self.inner.truncate(path, len)
    }
}
