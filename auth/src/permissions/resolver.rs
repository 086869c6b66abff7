//! Permission resolution logic.
//!
//! Decides what an admin user may do from the roles and direct permissions
//! already loaded for them. Every check is a total function: a missing grant
//! resolves to `false`, never to an error.

use std::collections::HashSet;

use thiserror::Error;

use super::models::{Permission, Role, Slugged, ADMINISTRATOR};

/// Index a collection by slug for constant-time membership tests.
pub fn slug_index<T: Slugged>(items: &[T]) -> HashSet<&str> {
    items.iter().map(Slugged::slug).collect()
}

/// Check if `roles` contains a role with exactly this slug.
pub fn is_role(roles: &[Role], role: &str) -> bool {
    slug_index(roles).contains(role)
}

/// Check if `roles` contains the administrator role.
pub fn is_administrator(roles: &[Role]) -> bool {
    is_role(roles, ADMINISTRATOR)
}

/// Check if `roles` contains at least one of `candidates`.
///
/// An empty candidate list matches nothing.
pub fn in_roles<S: AsRef<str>>(roles: &[Role], candidates: &[S]) -> bool {
    if candidates.is_empty() {
        return false;
    }

    let granted = slug_index(roles);
    candidates.iter().any(|c| granted.contains(c.as_ref()))
}

/// Check if a single role grants `permission`.
pub fn role_can(role: &Role, permission: &str) -> bool {
    !permission.is_empty() && slug_index(&role.permissions).contains(permission)
}

/// Decide whether a user may perform `permission`.
///
/// Resolution order:
/// 1. Administrators pass every check
/// 2. Direct permissions, when the user type supports them
/// 3. Permissions granted by any held role
pub fn can(roles: &[Role], direct: Option<&[Permission]>, permission: &str) -> bool {
    if is_administrator(roles) {
        tracing::debug!(permission, "granted by administrator override");
        return true;
    }

    // Empty slugs are never a grant key
    if permission.is_empty() {
        tracing::debug!("denied empty permission slug");
        return false;
    }

    if let Some(direct) = direct {
        if slug_index(direct).contains(permission) {
            tracing::trace!(permission, "granted directly");
            return true;
        }
    }

    if let Some(role) = roles.iter().find(|role| role.can(permission)) {
        tracing::trace!(permission, role = %role.slug, "granted by role");
        return true;
    }

    tracing::debug!(permission, "permission denied");
    false
}

/// Collect the effective permission set: every role-derived permission plus
/// every direct permission, deduplicated by slug.
///
/// Permissions with an empty slug are left out, matching [`can`].
pub fn all_permissions(roles: &[Role], direct: Option<&[Permission]>) -> HashSet<Permission> {
    roles
        .iter()
        .flat_map(|role| role.permissions.iter())
        .chain(direct.unwrap_or_default())
        .filter(|permission| !permission.slug.is_empty())
        .cloned()
        .collect()
}

/// Check if an element restricted to `allowed` roles is visible to the holder
/// of `roles`.
///
/// No restriction means visible to everyone. Otherwise the user needs one of
/// the allowed roles or the administrator role.
pub fn visible<R: Slugged>(roles: &[Role], allowed: &[R]) -> bool {
    if allowed.is_empty() {
        return true;
    }

    let slugs: Vec<&str> = allowed.iter().map(Slugged::slug).collect();
    in_roles(roles, &slugs) || is_administrator(roles)
}

/// Permission check errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermissionError {
    /// User lacks the required permission.
    #[error("Missing permission: {0}")]
    MissingPermission(String),

    /// User does not hold the required role.
    #[error("Missing role: {0}")]
    MissingRole(String),

    /// User holds none of the accepted roles.
    #[error("User holds none of the roles: {}", .0.join(", "))]
    NotInRoles(Vec<String>),
}
