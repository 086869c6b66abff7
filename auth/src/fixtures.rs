//! JSON-backed data access for roles, permissions, and users.
//!
//! Loads a fixture document, validates every reference, and materializes
//! fully loaded [`AdminUser`] values for the resolver.
//!
//! ```json
//! {
//!   "permissions": [{ "slug": "post.edit", "name": "Edit posts" }],
//!   "roles": [{ "slug": "editor", "name": "Editor", "permissions": ["post.edit"] }],
//!   "users": [{ "username": "alice", "name": "Alice", "roles": ["editor"] }]
//! }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::permissions::{AdminUser, Permission, Role};

/// Fixture loading errors.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// Fixture file could not be read.
    #[error("Failed to read fixtures from {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Fixture document is not valid JSON for the expected shape.
    #[error("Invalid fixture document: {0}")]
    Parse(#[from] serde_json::Error),

    /// A slug or username is empty.
    #[error("Empty {0} key")]
    EmptyKey(&'static str),

    /// The same key is defined twice.
    #[error("Duplicate {kind} '{key}'")]
    Duplicate { kind: &'static str, key: String },

    /// A role or user references something that is not defined.
    #[error("{owner} references unknown {kind} '{key}'")]
    UnknownReference {
        owner: String,
        kind: &'static str,
        key: String,
    },

    /// No user with this username.
    #[error("User '{0}' not found")]
    UnknownUser(String),
}

#[derive(Debug, Deserialize)]
struct FixtureDocument {
    #[serde(default)]
    permissions: Vec<Permission>,
    #[serde(default)]
    roles: Vec<RoleRecord>,
    #[serde(default)]
    users: Vec<UserRecord>,
}

#[derive(Debug, Deserialize)]
struct RoleRecord {
    slug: String,
    name: String,
    #[serde(default)]
    permissions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct UserRecord {
    id: Option<Uuid>,
    username: String,
    name: String,
    #[serde(default)]
    roles: Vec<String>,
    #[serde(default)]
    permissions: Vec<String>,
    created_at: Option<DateTime<Utc>>,
}

/// User row with references resolved to keys of the fixture maps.
#[derive(Debug, Clone)]
struct StoredUser {
    id: Uuid,
    username: String,
    name: String,
    roles: Vec<String>,
    permissions: Vec<String>,
    created_at: DateTime<Utc>,
}

/// Validated, in-memory fixture set.
#[derive(Debug, Clone, Default)]
pub struct Fixtures {
    permissions: HashMap<String, Permission>,
    roles: HashMap<String, Role>,
    users: HashMap<String, StoredUser>,
}

impl Fixtures {
    /// Load fixtures from a JSON file.
    #[tracing::instrument]
    pub fn from_path(path: &Path) -> Result<Self, FixtureError> {
        let raw = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&raw)
    }

    /// Parse and validate a fixture document.
    pub fn from_json(raw: &str) -> Result<Self, FixtureError> {
        let document: FixtureDocument = serde_json::from_str(raw)?;
        let fixtures = Self::from_document(document)?;

        tracing::info!(
            permissions = fixtures.permissions.len(),
            roles = fixtures.roles.len(),
            users = fixtures.users.len(),
            "Fixtures loaded"
        );

        Ok(fixtures)
    }

    fn from_document(document: FixtureDocument) -> Result<Self, FixtureError> {
        let mut permissions = HashMap::with_capacity(document.permissions.len());
        for permission in document.permissions {
            if permission.slug.is_empty() {
                return Err(FixtureError::EmptyKey("permission"));
            }
            if permissions.contains_key(&permission.slug) {
                return Err(FixtureError::Duplicate {
                    kind: "permission",
                    key: permission.slug,
                });
            }
            permissions.insert(permission.slug.clone(), permission);
        }

        let mut roles = HashMap::with_capacity(document.roles.len());
        for record in document.roles {
            if record.slug.is_empty() {
                return Err(FixtureError::EmptyKey("role"));
            }
            if roles.contains_key(&record.slug) {
                return Err(FixtureError::Duplicate {
                    kind: "role",
                    key: record.slug,
                });
            }

            let owner = format!("Role '{}'", record.slug);
            let granted = resolve_permissions(&permissions, &record.permissions, &owner)?;
            let role = Role {
                slug: record.slug.clone(),
                name: record.name,
                permissions: granted,
            };
            roles.insert(record.slug, role);
        }

        let mut users = HashMap::with_capacity(document.users.len());
        for record in document.users {
            if record.username.is_empty() {
                return Err(FixtureError::EmptyKey("username"));
            }
            if users.contains_key(&record.username) {
                return Err(FixtureError::Duplicate {
                    kind: "username",
                    key: record.username,
                });
            }

            let owner = format!("User '{}'", record.username);
            if let Some(missing) = record.roles.iter().find(|r| !roles.contains_key(*r)) {
                return Err(FixtureError::UnknownReference {
                    owner,
                    kind: "role",
                    key: missing.clone(),
                });
            }
            resolve_permissions(&permissions, &record.permissions, &owner)?;

            let user = StoredUser {
                id: record.id.unwrap_or_else(Uuid::now_v7),
                username: record.username.clone(),
                name: record.name,
                roles: record.roles,
                permissions: record.permissions,
                created_at: record.created_at.unwrap_or_else(Utc::now),
            };
            users.insert(record.username, user);
        }

        Ok(Self {
            permissions,
            roles,
            users,
        })
    }

    /// Materialize a user with all roles and direct permissions loaded.
    pub fn user(&self, username: &str) -> Result<AdminUser, FixtureError> {
        let stored = self
            .users
            .get(username)
            .ok_or_else(|| FixtureError::UnknownUser(username.to_string()))?;

        // References were validated on load
        let roles = stored
            .roles
            .iter()
            .filter_map(|slug| self.roles.get(slug).cloned())
            .collect();
        let permissions = stored
            .permissions
            .iter()
            .filter_map(|slug| self.permissions.get(slug).cloned())
            .collect();

        Ok(AdminUser {
            id: stored.id,
            username: stored.username.clone(),
            name: stored.name.clone(),
            roles,
            permissions,
            created_at: stored.created_at,
        })
    }

    /// Look up a role by slug.
    pub fn role(&self, slug: &str) -> Option<&Role> {
        self.roles.get(slug)
    }

    /// All usernames, sorted.
    pub fn usernames(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.users.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

fn resolve_permissions(
    known: &HashMap<String, Permission>,
    slugs: &[String],
    owner: &str,
) -> Result<Vec<Permission>, FixtureError> {
    slugs
        .iter()
        .map(|slug| {
            known
                .get(slug)
                .cloned()
                .ok_or_else(|| FixtureError::UnknownReference {
                    owner: owner.to_string(),
                    kind: "permission",
                    key: slug.clone(),
                })
        })
        .collect()
}
