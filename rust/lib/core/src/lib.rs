pub mod config;
pub mod error;
pub mod types;

pub use config::StoreConfig;
pub use error::ServiceError;
pub use types::{epoch_millis, merge_patch, now_rfc3339};
