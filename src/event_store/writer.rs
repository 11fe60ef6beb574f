//! Store Writer - appends events and snapshots, answers ordering queries

use std::path::Path;
use std::sync::Arc;

use crate::codec::TypeRegistry;
use crate::error::StoreResult;
use crate::types::{AggregateKey, DomainEvent, Sequence, Snapshot};

use super::reader::FileStoreReader;
use super::record_store::RecordStore;
use super::store::{StoreReader, StoreWriter};

/// Writer bound to the log files of one stream
///
/// Holds no open handles: each call opens, writes and releases the file it
/// needs. Only one writer per log may append at a time.
#[derive(Debug, Clone)]
pub struct FileStoreWriter<K> {
    reader: FileStoreReader<K>,
}

impl<K: AggregateKey> FileStoreWriter<K> {
    pub fn new(reader: FileStoreReader<K>) -> Self {
        Self { reader }
    }

    pub fn event_path(&self) -> &Path {
        self.reader.event_path()
    }

    pub fn snapshot_path(&self) -> &Path {
        self.reader.snapshot_path()
    }

    fn records(&self) -> &RecordStore {
        &self.reader.records
    }

    fn registry(&self) -> &Arc<TypeRegistry<K>> {
        &self.reader.registry
    }
}

impl<K: AggregateKey> StoreWriter<K> for FileStoreWriter<K> {
    fn save_events(&self, events: &[&dyn DomainEvent<K>]) -> StoreResult<()> {
        let envelopes = events
            .iter()
            .map(|event| self.registry().encode_event(*event))
            .collect::<StoreResult<Vec<_>>>()?;

        self.records().append(self.event_path(), &envelopes)?;
        Ok(())
    }

    fn save_snapshot(&self, snapshot: &dyn Snapshot<K>) -> StoreResult<()> {
        let envelope = self.registry().encode_snapshot(snapshot)?;

        self.records().append(self.snapshot_path(), &[envelope])?;
        Ok(())
    }

    /// Highest sequence among the key's events
    fn get_latest_sequence_for(&self, aggregate_id: &K) -> StoreResult<Option<Sequence>> {
        let mut latest = None;
        for event in self.reader.load_events(aggregate_id)? {
            latest = latest.max(Some(event?.sequence()));
        }
        Ok(latest)
    }

    fn get_number_of_events_since_snapshot_for(&self, aggregate_id: &K) -> StoreResult<usize> {
        let since = self.get_latest_snapshot_sequence_for(aggregate_id)?;

        let mut count = 0;
        for event in self.reader.load_events_since(aggregate_id, since)? {
            event?;
            count += 1;
        }
        Ok(count)
    }

    fn get_latest_snapshot_sequence_for(&self, aggregate_id: &K) -> StoreResult<Option<Sequence>> {
        Ok(self
            .reader
            .load_latest_snapshot_for(aggregate_id)?
            .map(|snapshot| snapshot.sequence()))
    }
}
