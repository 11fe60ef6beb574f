//! Type registry for polymorphic payloads
//!
//! Maps each persisted type tag to the decoder of its concrete type. Events
//! and snapshots are registered separately so a tag can never be decoded
//! into the wrong kind of payload.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{PayloadKind, StoreError, StoreResult};
use crate::types::{AggregateKey, DomainEvent, Envelope, Snapshot, TypeTagged};

type EventDecoder<K> = fn(Value) -> serde_json::Result<Box<dyn DomainEvent<K>>>;
type SnapshotDecoder<K> = fn(Value) -> serde_json::Result<Box<dyn Snapshot<K>>>;

struct Registration<D> {
    type_name: &'static str,
    decode: D,
}

/// Tag → decoder lookup used when reading logs back
pub struct TypeRegistry<K> {
    events: HashMap<&'static str, Registration<EventDecoder<K>>>,
    snapshots: HashMap<&'static str, Registration<SnapshotDecoder<K>>>,
}

fn decode_event_as<K, E>(value: Value) -> serde_json::Result<Box<dyn DomainEvent<K>>>
where
    K: AggregateKey,
    E: DomainEvent<K> + DeserializeOwned,
{
    Ok(Box::new(serde_json::from_value::<E>(value)?))
}

fn decode_snapshot_as<K, S>(value: Value) -> serde_json::Result<Box<dyn Snapshot<K>>>
where
    K: AggregateKey,
    S: Snapshot<K> + DeserializeOwned,
{
    Ok(Box::new(serde_json::from_value::<S>(value)?))
}

fn insert<D>(
    map: &mut HashMap<&'static str, Registration<D>>,
    kind: PayloadKind,
    tag: &'static str,
    type_name: &'static str,
    decode: D,
) {
    if let Some(previous) = map.insert(tag, Registration { type_name, decode }) {
        if previous.type_name != type_name {
            tracing::warn!(
                %kind,
                tag,
                previous = previous.type_name,
                replacement = type_name,
                "type tag re-registered with a different type"
            );
        }
    }
}

impl<K: AggregateKey> TypeRegistry<K> {
    pub fn new() -> Self {
        Self {
            events: HashMap::new(),
            snapshots: HashMap::new(),
        }
    }

    /// Register an event type under its [`TypeTagged::TYPE_TAG`]
    pub fn register_event<E>(&mut self) -> &mut Self
    where
        E: DomainEvent<K> + TypeTagged + DeserializeOwned,
    {
        insert(
            &mut self.events,
            PayloadKind::Event,
            E::TYPE_TAG,
            std::any::type_name::<E>(),
            decode_event_as::<K, E> as EventDecoder<K>,
        );
        self
    }

    /// Register a snapshot type under its [`TypeTagged::TYPE_TAG`]
    pub fn register_snapshot<S>(&mut self) -> &mut Self
    where
        S: Snapshot<K> + TypeTagged + DeserializeOwned,
    {
        insert(
            &mut self.snapshots,
            PayloadKind::Snapshot,
            S::TYPE_TAG,
            std::any::type_name::<S>(),
            decode_snapshot_as::<K, S> as SnapshotDecoder<K>,
        );
        self
    }

    pub fn with_event<E>(mut self) -> Self
    where
        E: DomainEvent<K> + TypeTagged + DeserializeOwned,
    {
        self.register_event::<E>();
        self
    }

    pub fn with_snapshot<S>(mut self) -> Self
    where
        S: Snapshot<K> + TypeTagged + DeserializeOwned,
    {
        self.register_snapshot::<S>();
        self
    }

    pub fn has_event(&self, tag: &str) -> bool {
        self.events.contains_key(tag)
    }

    pub fn has_snapshot(&self, tag: &str) -> bool {
        self.snapshots.contains_key(tag)
    }

    /// Wrap an event for writing
    ///
    /// Fails for unregistered tags, since such a record could never be read
    /// back.
    pub fn encode_event(&self, event: &dyn DomainEvent<K>) -> StoreResult<Envelope<K>> {
        let tag = event.type_tag();
        if !self.has_event(tag) {
            return Err(StoreError::UnknownTypeTag {
                kind: PayloadKind::Event,
                tag: tag.to_string(),
            });
        }

        let payload = event.to_json().map_err(|source| StoreError::PayloadEncode {
            tag: tag.to_string(),
            source,
        })?;
        Ok(Envelope::new(event.aggregate_id().clone(), tag, payload))
    }

    /// Wrap a snapshot for writing
    pub fn encode_snapshot(&self, snapshot: &dyn Snapshot<K>) -> StoreResult<Envelope<K>> {
        let tag = snapshot.type_tag();
        if !self.has_snapshot(tag) {
            return Err(StoreError::UnknownTypeTag {
                kind: PayloadKind::Snapshot,
                tag: tag.to_string(),
            });
        }

        let payload = snapshot.to_json().map_err(|source| StoreError::PayloadEncode {
            tag: tag.to_string(),
            source,
        })?;
        Ok(Envelope::new(snapshot.aggregate_id().clone(), tag, payload))
    }

    /// Recover the concrete event named by the envelope's tag
    pub fn decode_event(&self, envelope: Envelope<K>) -> StoreResult<Box<dyn DomainEvent<K>>> {
        let registration =
            self.events
                .get(envelope.type_tag.as_str())
                .ok_or_else(|| StoreError::UnknownTypeTag {
                    kind: PayloadKind::Event,
                    tag: envelope.type_tag.clone(),
                })?;

        (registration.decode)(envelope.payload).map_err(|source| StoreError::PayloadDecode {
            tag: envelope.type_tag,
            source,
        })
    }

    /// Recover the concrete snapshot named by the envelope's tag
    pub fn decode_snapshot(&self, envelope: Envelope<K>) -> StoreResult<Box<dyn Snapshot<K>>> {
        let registration =
            self.snapshots
                .get(envelope.type_tag.as_str())
                .ok_or_else(|| StoreError::UnknownTypeTag {
                    kind: PayloadKind::Snapshot,
                    tag: envelope.type_tag.clone(),
                })?;

        (registration.decode)(envelope.payload).map_err(|source| StoreError::PayloadDecode {
            tag: envelope.type_tag,
            source,
        })
    }
}

impl<K: AggregateKey> Default for TypeRegistry<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> std::fmt::Debug for TypeRegistry<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut events: Vec<_> = self.events.keys().collect();
        let mut snapshots: Vec<_> = self.snapshots.keys().collect();
        events.sort();
        snapshots.sort();

        f.debug_struct("TypeRegistry")
            .field("events", &events)
            .field("snapshots", &snapshots)
            .finish()
    }
}
