//! Event Store Module
//!
//! This module provides the file-backed event sourcing store:
//! - `RecordStore`: JSONL append/scan over a single file
//! - `FileStoreReader`: queries over the event and snapshot logs of a stream
//! - `FileStoreWriter`: appends events/snapshots and answers ordering queries
//! - `FileEventStore`: builds readers and writers for a stream context
//! - `NamingConvention`: derives stream names from key and aggregate types
//!
//! # Architecture
//!
//! ```text
//! Write Path:
//! ┌────────────┐    ┌──────────────┐    ┌────────────────┐    ┌─────────────────────┐
//! │ Aggregate  │───►│ TypeRegistry │───►│ RecordStore    │───►│ <stream>.events.json│
//! │ events     │    │ encode tag   │    │ one batch write│    │ (append only)       │
//! └────────────┘    └──────────────┘    └────────────────┘    └─────────────────────┘
//!
//! Read Path (Rehydrate):
//! ┌────────────────────┐    ┌──────────────────────┐
//! │ Latest snapshot    │───►│ Events with sequence │───► Aggregate state
//! │ (.snapshots.json)  │    │ after the snapshot   │
//! └────────────────────┘    └──────────────────────┘
//! ```

mod context;
mod reader;
mod record_store;
mod store;
mod writer;

pub use context::{
    short_type_name, AggregateNamingConvention, EventStoreContext,
    KeyAndAggregateNamingConvention, KeyTypeNamingConvention, NamingConvention,
};
pub use reader::FileStoreReader;
pub use record_store::{RecordIter, RecordStore};
pub use store::{EventIter, EventStore, FileEventStore, FileStoreConfig, StoreReader, StoreWriter};
pub use writer::FileStoreWriter;
