//! Admin Auth
//!
//! Role-based permission resolution for admin panel users: direct grants,
//! role grants, and the `administrator` override.

pub mod config;
pub mod fixtures;
pub mod permissions;

pub use permissions::{AdminUser, HasPermissions, Permission, PermissionError, Role, RoleRef};
