pub mod identity;
pub mod policy;

pub use identity::{require_identity, Identity};
pub use policy::{require_permission, Permission, Role};
