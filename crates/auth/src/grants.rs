//! Role → permission lookups.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::{Permission, Role};

/// Source of role grants (the role store).
///
/// Implementations answer from master data; `None` means the role is not
/// defined at all, which callers must treat as "no grants" (fail closed).
pub trait RoleGrants: Send + Sync {
    /// Permissions granted to `role`, or `None` if the role is unknown.
    fn permissions_of(&self, role: &Role) -> Option<BTreeSet<Permission>>;

    /// Whether `role` is defined and grants `permission`.
    fn grants(&self, role: &Role, permission: &Permission) -> bool {
        self.permissions_of(role)
            .is_some_and(|perms| perms.contains(permission))
    }
}

impl<S> RoleGrants for Arc<S>
where
    S: RoleGrants + ?Sized,
{
    fn permissions_of(&self, role: &Role) -> Option<BTreeSet<Permission>> {
        (**self).permissions_of(role)
    }

    fn grants(&self, role: &Role, permission: &Permission) -> bool {
        (**self).grants(role, permission)
    }
}

impl RoleGrants for HashMap<Role, BTreeSet<Permission>> {
    fn permissions_of(&self, role: &Role) -> Option<BTreeSet<Permission>> {
        self.get(role).cloned()
    }

    fn grants(&self, role: &Role, permission: &Permission) -> bool {
        self.get(role).is_some_and(|perms| perms.contains(permission))
    }
}
