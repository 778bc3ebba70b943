//! Record store: keyed collections persisted as one JSON array per slot.
//!
//! An entity type implements [`Entity`] to declare its key field and
//! hooks. [`RecordStore`] provides CRUD, filtering and aggregates on top
//! of any `staffdesk_kv::KVStore` backend.
//!
//! ```ignore
//! let users = RecordStore::<UserRecord>::new(kv.clone());
//! users.create(record)?;
//! let by_domain = users.aggregate_by("domain");
//! ```

pub mod entity;
pub mod filter;
pub mod query;
pub mod record;

pub use entity::Entity;
pub use filter::{FilterSpec, ALL};
pub use record::RecordStore;
