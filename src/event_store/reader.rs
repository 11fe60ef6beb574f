//! Store Reader - read-only queries over one event log and one snapshot log
//!
//! Every query scans the whole log it needs and decodes every line on the
//! way, so a single unreadable record fails the query instead of being
//! skipped. Nothing is cached between calls.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::codec::TypeRegistry;
use crate::error::StoreResult;
use crate::types::{AggregateKey, Envelope, RecordedEvent, Sequence, Snapshot};

use super::record_store::RecordStore;
use super::store::{EventIter, StoreReader};

/// Reader bound to the log files of one stream
#[derive(Debug, Clone)]
pub struct FileStoreReader<K> {
    pub(super) records: RecordStore,
    pub(super) registry: Arc<TypeRegistry<K>>,
    pub(super) event_path: PathBuf,
    pub(super) snapshot_path: PathBuf,
}

impl<K: AggregateKey> FileStoreReader<K> {
    pub fn new(
        records: RecordStore,
        registry: Arc<TypeRegistry<K>>,
        event_path: PathBuf,
        snapshot_path: PathBuf,
    ) -> Self {
        Self {
            records,
            registry,
            event_path,
            snapshot_path,
        }
    }

    pub fn event_path(&self) -> &Path {
        &self.event_path
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    /// Every event of the log paired with the key it was stored under
    fn keyed_events(
        &self,
    ) -> StoreResult<impl Iterator<Item = StoreResult<(K, RecordedEvent<K>)>> + '_> {
        let registry = &self.registry;
        let mut failed = false;

        let records = self.records.scan::<Envelope<K>>(&self.event_path)?;
        let events = records
            .enumerate()
            .map(move |(position, record)| {
                let envelope = record?;
                let id = envelope.id.clone();
                let event = registry.decode_event(envelope)?;
                Ok((id, RecordedEvent::new(position as u64, event)))
            })
            // An unknown tag ends the scan just like a malformed line.
            .map_while(move |item: StoreResult<_>| {
                if failed {
                    return None;
                }
                failed = item.is_err();
                Some(item)
            });

        Ok(events)
    }

    fn events_for(
        &self,
        aggregate_id: &K,
        since: Option<Sequence>,
    ) -> StoreResult<EventIter<'_, K>> {
        let aggregate_id = aggregate_id.clone();

        let events = self.keyed_events()?.filter_map(move |item| match item {
            Ok((id, event)) if id == aggregate_id => match since {
                Some(bound) if event.sequence() <= bound => None,
                _ => Some(Ok(event)),
            },
            Ok(_) => None,
            Err(e) => Some(Err(e)),
        });

        Ok(Box::new(events))
    }
}

impl<K: AggregateKey> StoreReader<K> for FileStoreReader<K> {
    fn load_events(&self, aggregate_id: &K) -> StoreResult<EventIter<'_, K>> {
        self.events_for(aggregate_id, None)
    }

    fn load_events_since(
        &self,
        aggregate_id: &K,
        sequence: Option<Sequence>,
    ) -> StoreResult<EventIter<'_, K>> {
        self.events_for(aggregate_id, sequence)
    }

    /// Last snapshot for the key in storage order, not the highest sequence
    fn load_latest_snapshot_for(&self, aggregate_id: &K) -> StoreResult<Option<Box<dyn Snapshot<K>>>> {
        let mut latest = None;

        for record in self.records.scan::<Envelope<K>>(&self.snapshot_path)? {
            let envelope = record?;
            let matches = envelope.id == *aggregate_id;
            let snapshot = self.registry.decode_snapshot(envelope)?;
            if matches {
                latest = Some(snapshot);
            }
        }

        Ok(latest)
    }

    fn load_all_keys(&self) -> StoreResult<HashSet<K>> {
        let mut keys = HashSet::new();
        for item in self.keyed_events()? {
            let (id, _) = item?;
            keys.insert(id);
        }
        Ok(keys)
    }

    fn load_all_events(&self) -> StoreResult<EventIter<'_, K>> {
        let events = self.keyed_events()?.map(|item| item.map(|(_, event)| event));
        Ok(Box::new(events))
    }
}
