use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use spmi_auth::{Role, User};
use spmi_core::UserId;

/// Lookup of authenticated users and their current role assignments.
pub trait UserDirectory: Send + Sync {
    fn get(&self, user_id: &UserId) -> Option<User>;
}

impl<S> UserDirectory for Arc<S>
where
    S: UserDirectory + ?Sized,
{
    fn get(&self, user_id: &UserId) -> Option<User> {
        (**self).get(user_id)
    }
}

/// In-memory user directory for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    inner: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&self, user: User) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(user.id, user);
        }
    }

    /// Append `role` to the user's assignments. Returns false for unknown users.
    pub fn assign_role(&self, user_id: &UserId, role: Role) -> bool {
        self.update_roles(user_id, |roles| roles.push(role))
    }

    /// Drop `role` from the user's assignments. Returns false for unknown users.
    pub fn revoke_role(&self, user_id: &UserId, role: &str) -> bool {
        self.update_roles(user_id, |roles| roles.retain(|r| r.as_str() != role))
    }

    fn update_roles(&self, user_id: &UserId, change: impl FnOnce(&mut Vec<Role>)) -> bool {
        let Ok(mut map) = self.inner.write() else {
            return false;
        };
        let Some(user) = map.get_mut(user_id) else {
            return false;
        };

        let mut roles = user.roles().to_vec();
        change(&mut roles);
        *user = User::new(user.id, user.name.clone(), roles);
        true
    }
}

impl UserDirectory for InMemoryUserDirectory {
    fn get(&self, user_id: &UserId) -> Option<User> {
        let map = self.inner.read().ok()?;
        map.get(user_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_assignment_changes_are_visible_on_next_lookup() {
        let dir = InMemoryUserDirectory::new();
        let id = UserId::new();
        dir.upsert(User::new(id, "Budi", vec![Role::new("auditor")]));

        assert!(dir.assign_role(&id, Role::new("auditee")));
        assert!(dir.assign_role(&id, Role::new("auditor")));
        assert_eq!(dir.get(&id).unwrap().roles().len(), 2);

        assert!(dir.revoke_role(&id, "auditor"));
        let roles: Vec<String> = dir.get(&id).unwrap().roles().iter().map(|r| r.to_string()).collect();
        assert_eq!(roles, vec!["auditee".to_string()]);
    }

    #[test]
    fn unknown_users_are_not_created_implicitly() {
        let dir = InMemoryUserDirectory::new();
        let id = UserId::new();
        assert!(!dir.assign_role(&id, Role::new("auditor")));
        assert!(dir.get(&id).is_none());
    }
}
