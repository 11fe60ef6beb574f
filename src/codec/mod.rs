//! Payload codec
//!
//! Records are JSON lines. The envelope carries the aggregate key and a type
//! tag; the [`TypeRegistry`] turns the tagged payload back into its concrete
//! event or snapshot type.

mod registry;

pub use registry::TypeRegistry;
