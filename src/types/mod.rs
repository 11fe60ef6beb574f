//! Data types for the ledger store
//!
//! Ordering keys, the payload traits implemented by domain events and
//! snapshots, and the envelope written to disk for each record.

mod envelope;
mod event;
mod sequence;

pub use envelope::Envelope;
pub use event::{AggregateKey, DomainEvent, Payload, RecordedEvent, Snapshot, TypeTagged};
pub use sequence::Sequence;
