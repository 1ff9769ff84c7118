//! Authenticated user as seen by the authorization layer.

use serde::Serialize;

use spmi_core::{DomainError, DomainResult, UserId};

use crate::Role;

/// A user and the roles assigned to them.
///
/// # Invariants
/// - `roles` keeps assignment order with duplicates removed, so "the first
///   assigned role" is always well-defined.
/// - Role names are never blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    roles: Vec<Role>,
}

impl User {
    pub fn new(id: UserId, name: impl Into<String>, roles: impl IntoIterator<Item = Role>) -> Self {
        let mut deduped: Vec<Role> = Vec::new();
        for role in roles {
            if role.as_str().trim().is_empty() || deduped.contains(&role) {
                continue;
            }
            deduped.push(role);
        }

        Self {
            id,
            name: name.into(),
            roles: deduped,
        }
    }

    /// Strict constructor for master data: rejects blank names and blank role names
    /// instead of silently dropping them.
    pub fn try_new(
        id: UserId,
        name: impl Into<String>,
        roles: impl IntoIterator<Item = Role>,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("user name cannot be empty"));
        }

        let roles: Vec<Role> = roles.into_iter().collect();
        if roles.iter().any(|r| r.as_str().trim().is_empty()) {
            return Err(DomainError::validation("role name cannot be empty"));
        }

        Ok(Self::new(id, name.trim().to_string(), roles))
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.as_str() == role)
    }

    /// Find the assigned role with the given name.
    pub fn assigned_role(&self, role: &str) -> Option<&Role> {
        self.roles.iter().find(|r| r.as_str() == role)
    }
}
