use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;

use spmi_auth::{Permission, Role, RoleGrants};

/// In-memory role store (role name → granted permissions).
///
/// `superadmin` may be defined here like any other role, but its grants are
/// never consulted: the evaluator short-circuits on the name.
#[derive(Debug, Default)]
pub struct InMemoryRoleStore {
    inner: RwLock<HashMap<Role, BTreeSet<Permission>>>,
}

impl InMemoryRoleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define (or redefine) a role with exactly `permissions`.
    pub fn define(&self, role: Role, permissions: impl IntoIterator<Item = Permission>) {
        let perms: BTreeSet<Permission> = permissions.into_iter().filter(|p| !p.is_blank()).collect();
        if let Ok(mut map) = self.inner.write() {
            map.insert(role, perms);
        }
    }

    pub fn grant(&self, role: &Role, permission: Permission) {
        if permission.is_blank() {
            return;
        }
        if let Ok(mut map) = self.inner.write() {
            map.entry(role.clone()).or_default().insert(permission);
        }
    }

    pub fn revoke(&self, role: &Role, permission: &Permission) {
        if let Ok(mut map) = self.inner.write() {
            if let Some(perms) = map.get_mut(role) {
                perms.remove(permission);
            }
        }
    }

    pub fn remove(&self, role: &Role) {
        if let Ok(mut map) = self.inner.write() {
            map.remove(role);
        }
    }
}

impl RoleGrants for InMemoryRoleStore {
    fn permissions_of(&self, role: &Role) -> Option<BTreeSet<Permission>> {
        // A poisoned lock reads as "unknown role": fail closed.
        let map = self.inner.read().ok()?;
        map.get(role).cloned()
    }

    fn grants(&self, role: &Role, permission: &Permission) -> bool {
        self.inner
            .read()
            .map(|map| map.get(role).is_some_and(|perms| perms.contains(permission)))
            .unwrap_or(false)
    }
}
