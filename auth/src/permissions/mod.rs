//! Permission system types and utilities.
//!
//! Role-based model for admin panel users:
//! - Direct permissions: granted to a single user
//! - Role permissions: granted to every holder of a role
//! - The `administrator` role passes every check

pub mod helpers;
pub mod models;
pub mod resolver;
pub mod user;

pub use helpers::{require_any_role, require_permission, require_role};
pub use models::*;
pub use resolver::PermissionError;
pub use user::HasPermissions;
