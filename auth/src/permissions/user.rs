//! Capability checks for anything that holds roles.

use std::collections::HashSet;

use super::models::{AdminUser, Permission, Role, Slugged};
use super::resolver;

/// A user whose roles (and optionally direct permissions) are loaded.
///
/// Implementors only provide the accessors; all checks are provided methods.
/// User types without direct-permission support keep the default
/// [`HasPermissions::permissions`], and only role grants apply to them.
pub trait HasPermissions {
    /// Roles held by the user.
    fn roles(&self) -> &[Role];

    /// Permissions granted directly to the user, if the user type supports them.
    fn permissions(&self) -> Option<&[Permission]> {
        None
    }

    /// Check if the user may perform `permission`.
    fn can(&self, permission: &str) -> bool {
        resolver::can(self.roles(), self.permissions(), permission)
    }

    /// Check if the user may not perform `permission`.
    fn cannot(&self, permission: &str) -> bool {
        !self.can(permission)
    }

    fn is_administrator(&self) -> bool {
        resolver::is_administrator(self.roles())
    }

    /// Check if the user holds the role with this exact slug.
    fn is_role(&self, role: &str) -> bool {
        resolver::is_role(self.roles(), role)
    }

    /// Check if the user holds at least one of `roles`. Empty input is `false`.
    fn in_roles<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        resolver::in_roles(self.roles(), roles)
    }

    /// Effective permission set, deduplicated by slug.
    fn all_permissions(&self) -> HashSet<Permission> {
        resolver::all_permissions(self.roles(), self.permissions())
    }

    /// Check if an element restricted to `roles` is visible to the user.
    /// Empty input is `true`.
    fn visible<R: Slugged>(&self, roles: &[R]) -> bool {
        resolver::visible(self.roles(), roles)
    }
}

impl HasPermissions for AdminUser {
    fn roles(&self) -> &[Role] {
        &self.roles
    }

    fn permissions(&self) -> Option<&[Permission]> {
        Some(&self.permissions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// User type that only supports role grants.
    struct ApiClient {
        roles: Vec<Role>,
    }

    impl HasPermissions for ApiClient {
        fn roles(&self) -> &[Role] {
            &self.roles
        }
    }

    fn perm(slug: &str) -> Permission {
        Permission::new(slug, slug)
    }

    #[test]
    fn test_admin_user_direct_and_role_grants() {
        let user = AdminUser::new("alice", "Alice")
            .with_role(Role::new("editor", "Editor").with_permission(perm("post.edit")))
            .with_permission(perm("comment.delete"));

        assert!(user.can("post.edit"));
        assert!(user.can("comment.delete"));
        assert!(user.cannot("post.delete"));
        assert!(user.is_role("editor"));
        assert!(!user.is_administrator());
    }

    #[test]
    fn test_user_without_direct_permission_support() {
        let client = ApiClient {
            roles: vec![Role::new("reporter", "Reporter").with_permission(perm("report.view"))],
        };

        assert!(client.permissions().is_none());
        assert!(client.can("report.view"));
        assert!(client.cannot("report.export"));
        assert_eq!(client.all_permissions().len(), 1);
    }

    #[test]
    fn test_cannot_is_negation_of_can() {
        let user = AdminUser::new("bob", "Bob")
            .with_role(Role::new("viewer", "Viewer"))
            .with_permission(perm("dashboard.view"));

        for slug in ["dashboard.view", "post.edit", "", "Dashboard.View"] {
            assert_eq!(user.cannot(slug), !user.can(slug), "slug {slug:?}");
        }
    }

    #[test]
    fn test_administrator_sees_everything() {
        let admin = AdminUser::new("root", "Root").with_role(Role::administrator());
        let none: [&str; 0] = [];

        assert!(admin.is_administrator());
        assert!(admin.can("anything.random"));
        assert!(admin.visible(&["editor"]));
        assert!(admin.visible(&none));
        assert!(!admin.in_roles(&none));
    }
}
