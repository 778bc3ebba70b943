mod batch;
mod lenient;
mod role;
mod user;

pub use batch::*;
pub use role::*;
pub use user::*;
