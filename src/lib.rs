//! Ledger Store
//!
//! A file-backed event store for event-sourced aggregates. Events and
//! snapshots are appended as JSON lines to one pair of logs per stream and
//! decoded back into their concrete types through a type registry.
//!
//! # Features
//!
//! - **Append-only**: records are never rewritten or deleted
//! - **Polymorphic**: any number of event and snapshot types per stream
//! - **Lazy reads**: event queries stream the log one line at a time
//! - **Pluggable storage**: real files or an in-memory file system
//!
//! # Modules
//!
//! - `types`: Sequence numbers, payload traits, on-disk envelope
//! - `codec`: Type registry mapping type tags to decoders
//! - `storage`: File system abstraction (physical, in-memory)
//! - `event_store`: Record store, reader, writer, factory and naming
//! - `error`: Error type shared by every operation
//!
//! # Example
//!
//! ```no_run
//! use ledger_store::{
//!     DomainEvent, EventStore, EventStoreContext, FileEventStore, Sequence, StoreReader,
//!     StoreWriter, TypeRegistry, TypeTagged,
//! };
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! struct Deposited {
//!     account: String,
//!     sequence: Sequence,
//!     amount: i64,
//! }
//!
//! impl TypeTagged for Deposited {
//!     const TYPE_TAG: &'static str = "deposited";
//! }
//!
//! impl DomainEvent<String> for Deposited {
//!     fn aggregate_id(&self) -> &String {
//!         &self.account
//!     }
//!
//!     fn sequence(&self) -> Sequence {
//!         self.sequence
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = FileEventStore::new("data");
//!     let registry = TypeRegistry::new().with_event::<Deposited>();
//!     let context = EventStoreContext::new("accounts", registry);
//!
//!     let deposit = Deposited {
//!         account: "acc-1".to_string(),
//!         sequence: Sequence::new(1),
//!         amount: 100,
//!     };
//!     store.create_writer(&context).save_events(&[&deposit])?;
//!
//!     let reader = store.create_reader(&context);
//!     for event in reader.load_events(&"acc-1".to_string())? {
//!         println!("{:?}", event?);
//!     }
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod error;
pub mod event_store;
pub mod storage;
pub mod types;

// Re-export commonly used items at crate root
pub use codec::TypeRegistry;
pub use error::{PayloadKind, StoreError, StoreResult};
pub use event_store::{
    EventIter, EventStore, EventStoreContext, FileEventStore, FileStoreConfig, FileStoreReader,
    FileStoreWriter, KeyAndAggregateNamingConvention, NamingConvention, StoreReader, StoreWriter,
};
pub use storage::{FileSystem, InMemoryFileSystem, PhysicalFileSystem};
pub use types::{
    AggregateKey, DomainEvent, Envelope, Payload, RecordedEvent, Sequence, Snapshot, TypeTagged,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
