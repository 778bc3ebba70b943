//! Staff module: users partitioned by role, and training batches.
//!
//! # Resources
//!
//! - **UserRecord**: a staff member keyed by email; one variant per role
//! - **BatchRecord**: a scheduled training cohort keyed by its timestamp id
//!
//! # Usage
//!
//! ```ignore
//! use staffdesk_staff::StaffService;
//!
//! let service = StaffService::open(&config)?;
//! service.add_user(record)?;
//! let stats = service.staff_stats(Role::Trainer);
//! ```

pub mod model;
pub mod service;
mod store_impls;

pub use model::{
    Access, AdminUser, AnalystUser, BatchRecord, BatchStatus, CounselingMode, CounsellorUser,
    Role, StaffProfile, TrainerUser, UserRecord, UserStatus,
};
pub use service::StaffService;
