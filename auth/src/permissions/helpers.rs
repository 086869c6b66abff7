//! Guard helpers for callers that want an error instead of a boolean.
//!
//! Typically used by request handlers that turn a denial into a response.

use super::resolver::PermissionError;
use super::user::HasPermissions;

/// Require that the user may perform `permission`.
pub fn require_permission<U: HasPermissions>(
    user: &U,
    permission: &str,
) -> Result<(), PermissionError> {
    if user.can(permission) {
        Ok(())
    } else {
        Err(PermissionError::MissingPermission(permission.to_string()))
    }
}

/// Require that the user holds `role`. Administrators always pass.
pub fn require_role<U: HasPermissions>(user: &U, role: &str) -> Result<(), PermissionError> {
    if user.is_role(role) || user.is_administrator() {
        Ok(())
    } else {
        Err(PermissionError::MissingRole(role.to_string()))
    }
}

/// Require that the user holds one of `roles`. Administrators always pass.
///
/// An empty list only admits administrators.
pub fn require_any_role<U, S>(user: &U, roles: &[S]) -> Result<(), PermissionError>
where
    U: HasPermissions,
    S: AsRef<str>,
{
    if user.in_roles(roles) || user.is_administrator() {
        Ok(())
    } else {
        Err(PermissionError::NotInRoles(
            roles.iter().map(|r| r.as_ref().to_string()).collect(),
        ))
    }
}
