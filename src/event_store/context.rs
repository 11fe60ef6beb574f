//! Stream contexts and naming conventions
//!
//! A context binds a logical stream name to the type registry used to
//! decode it. Naming conventions derive that stream name from the key and
//! aggregate types, so every aggregate type gets its own pair of logs.

use std::sync::Arc;

use crate::codec::TypeRegistry;
use crate::types::AggregateKey;

/// Pure mapping from (key type, aggregate type) to a stream name
pub trait NamingConvention {
    fn stream_name(&self, key_type: &str, aggregate_type: &str) -> String;
}

/// Names streams after the key type (`Uuid`)
///
/// Aggregates that share a key type also share logs under this convention.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyTypeNamingConvention;

impl NamingConvention for KeyTypeNamingConvention {
    fn stream_name(&self, key_type: &str, _aggregate_type: &str) -> String {
        key_type.to_string()
    }
}

/// Names streams after the aggregate type (`Candidate`)
#[derive(Debug, Clone, Copy, Default)]
pub struct AggregateNamingConvention;

impl NamingConvention for AggregateNamingConvention {
    fn stream_name(&self, _key_type: &str, aggregate_type: &str) -> String {
        aggregate_type.to_string()
    }
}

/// Names streams after both types (`Uuid.Candidate`)
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyAndAggregateNamingConvention;

impl NamingConvention for KeyAndAggregateNamingConvention {
    fn stream_name(&self, key_type: &str, aggregate_type: &str) -> String {
        format!("{}.{}", key_type, aggregate_type)
    }
}

/// Type name without module path or generic arguments
///
/// `uuid::Uuid` becomes `Uuid`, `app::Wrapper<u8>` becomes `Wrapper`.
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Immutable binding of a stream name to its type registry
#[derive(Debug, Clone)]
pub struct EventStoreContext<K> {
    stream_name: String,
    registry: Arc<TypeRegistry<K>>,
}

impl<K: AggregateKey> EventStoreContext<K> {
    pub fn new(stream_name: impl Into<String>, registry: impl Into<Arc<TypeRegistry<K>>>) -> Self {
        Self {
            stream_name: stream_name.into(),
            registry: registry.into(),
        }
    }

    /// Derive the stream name for aggregate type `A` from a convention
    pub fn for_aggregate<A: ?Sized>(
        convention: &dyn NamingConvention,
        registry: impl Into<Arc<TypeRegistry<K>>>,
    ) -> Self {
        let stream_name = convention.stream_name(short_type_name::<K>(), short_type_name::<A>());
        Self::new(stream_name, registry)
    }

    pub fn stream_name(&self) -> &str {
        &self.stream_name
    }

    pub fn registry(&self) -> &Arc<TypeRegistry<K>> {
        &self.registry
    }
}
