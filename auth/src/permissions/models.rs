//! Role, permission, and admin user models.
//!
//! Roles and permissions are keyed by slug. Two values with the same slug are
//! the same grant, whatever their display names say.

use std::borrow::Borrow;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::resolver;

/// Slug of the role that passes every permission check.
pub const ADMINISTRATOR: &str = "administrator";

/// A value identified by a slug.
pub trait Slugged {
    fn slug(&self) -> &str;
}

impl Slugged for &str {
    fn slug(&self) -> &str {
        self
    }
}

impl Slugged for String {
    fn slug(&self) -> &str {
        self
    }
}

/// A named capability, e.g. `post.edit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permission {
    /// Unique key, matched case-sensitively.
    pub slug: String,
    /// Display name.
    pub name: String,
}

impl Permission {
    pub fn new(slug: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
        }
    }
}

impl Slugged for Permission {
    fn slug(&self) -> &str {
        &self.slug
    }
}

impl PartialEq for Permission {
    fn eq(&self, other: &Self) -> bool {
        self.slug == other.slug
    }
}

impl Eq for Permission {}

// Must hash like `str` so `Borrow<str>` lookups work on sets.
impl Hash for Permission {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.slug.as_str().hash(state);
    }
}

impl Borrow<str> for Permission {
    fn borrow(&self) -> &str {
        &self.slug
    }
}

/// Role with the permissions it grants to its holders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    /// Unique key, matched case-sensitively.
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Permissions granted through this role.
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

impl Role {
    pub fn new(slug: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
            permissions: Vec::new(),
        }
    }

    /// The built-in role that bypasses all permission checks.
    pub fn administrator() -> Self {
        Self::new(ADMINISTRATOR, "Administrator")
    }

    #[must_use]
    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permissions.push(permission);
        self
    }

    /// Check if this role grants `permission`.
    pub fn can(&self, permission: &str) -> bool {
        resolver::role_can(self, permission)
    }

    /// Check if this role does not grant `permission`.
    pub fn cannot(&self, permission: &str) -> bool {
        !self.can(permission)
    }

    pub fn is_administrator(&self) -> bool {
        self.slug == ADMINISTRATOR
    }
}

impl Slugged for Role {
    fn slug(&self) -> &str {
        &self.slug
    }
}

impl PartialEq for Role {
    fn eq(&self, other: &Self) -> bool {
        self.slug == other.slug
    }
}

impl Eq for Role {}

impl Hash for Role {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.slug.as_str().hash(state);
    }
}

impl Borrow<str> for Role {
    fn borrow(&self) -> &str {
        &self.slug
    }
}

/// Reference to a role by slug only.
///
/// Used where the full role is not loaded, such as the roles a menu entry is
/// restricted to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleRef {
    pub slug: String,
}

impl RoleRef {
    pub fn new(slug: impl Into<String>) -> Self {
        Self { slug: slug.into() }
    }
}

impl From<&str> for RoleRef {
    fn from(slug: &str) -> Self {
        Self::new(slug)
    }
}

impl From<&Role> for RoleRef {
    fn from(role: &Role) -> Self {
        Self::new(role.slug.clone())
    }
}

impl Slugged for RoleRef {
    fn slug(&self) -> &str {
        &self.slug
    }
}

/// Admin panel user with roles and direct permissions already loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: Uuid,
    /// Login name (unique).
    pub username: String,
    /// Display name.
    pub name: String,
    /// Roles held by the user.
    #[serde(default)]
    pub roles: Vec<Role>,
    /// Permissions granted to the user independent of any role.
    #[serde(default)]
    pub permissions: Vec<Permission>,
    pub created_at: DateTime<Utc>,
}

impl AdminUser {
    pub fn new(username: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            username: username.into(),
            name: name.into(),
            roles: Vec::new(),
            permissions: Vec::new(),
            created_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.push(role);
        self
    }

    #[must_use]
    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permissions.push(permission);
        self
    }
}
