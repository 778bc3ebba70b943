//! Named-slot key-value storage.
//!
//! Each slot holds one opaque byte blob. Record collections are persisted
//! as a whole JSON array per slot, so the interface stays small: get, set
//! and delete.

pub mod error;
pub mod memory;
pub mod redb;
pub mod traits;

pub use error::KVError;
pub use memory::MemoryKV;
pub use redb::RedbStore;
pub use traits::KVStore;
