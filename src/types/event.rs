//! Event and snapshot payload traits
//!
//! Events and snapshots are stored as trait objects so one stream can hold
//! any number of concrete payload types. Each concrete type carries a
//! [`TypeTagged::TYPE_TAG`] that is written next to the payload and used on
//! the way back to pick the right decoder (see [`crate::codec::TypeRegistry`]).

use std::any::Any;
use std::fmt::Debug;
use std::hash::Hash;
use std::ops::Deref;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::Sequence;

/// Identifier type scoping records to one aggregate (a UUID, a string, ...)
pub trait AggregateKey:
    Clone + Eq + Hash + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
}

impl<T> AggregateKey for T where
    T: Clone + Eq + Hash + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
}

/// Stable discriminator for a concrete payload type
///
/// The tag is persisted, so renaming it breaks existing logs.
pub trait TypeTagged {
    const TYPE_TAG: &'static str;
}

/// Object-safe view over a serializable payload
///
/// Implemented automatically for every [`TypeTagged`] serde type.
pub trait Payload: Any + Debug + Send + Sync {
    fn type_tag(&self) -> &'static str;

    fn to_json(&self) -> serde_json::Result<serde_json::Value>;

    fn as_any(&self) -> &dyn Any;
}

impl<T> Payload for T
where
    T: TypeTagged + Serialize + Debug + Send + Sync + 'static,
{
    fn type_tag(&self) -> &'static str {
        T::TYPE_TAG
    }

    fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// One immutable state change of an aggregate
pub trait DomainEvent<K>: Payload {
    fn aggregate_id(&self) -> &K;

    fn sequence(&self) -> Sequence;
}

/// Aggregate state captured after the event with the same sequence
pub trait Snapshot<K>: Payload {
    fn aggregate_id(&self) -> &K;

    fn sequence(&self) -> Sequence;
}

impl<K: 'static> dyn DomainEvent<K> {
    /// Check the concrete type of the event
    pub fn is<T: Any>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

impl<K: 'static> dyn Snapshot<K> {
    /// Check the concrete type of the snapshot
    pub fn is<T: Any>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// An event as loaded from a log
///
/// `stream_sequence` is the zero-based position of the record in the whole
/// event log, across all aggregate keys. It is assigned on read and is only
/// stable while the log is append-only.
#[derive(Debug)]
pub struct RecordedEvent<K> {
    pub stream_sequence: u64,
    pub event: Box<dyn DomainEvent<K>>,
}

impl<K> RecordedEvent<K> {
    pub fn new(stream_sequence: u64, event: Box<dyn DomainEvent<K>>) -> Self {
        Self {
            stream_sequence,
            event,
        }
    }

    pub fn into_event(self) -> Box<dyn DomainEvent<K>> {
        self.event
    }
}

impl<K> Deref for RecordedEvent<K> {
    type Target = dyn DomainEvent<K>;

    fn deref(&self) -> &Self::Target {
        self.event.as_ref()
    }
}
