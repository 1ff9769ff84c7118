use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use spmi_auth::SessionState;
use spmi_core::SessionId;

/// Per-session authorization record storage.
///
/// Each call is a single atomic read or write; concurrent writers to the same
/// session are last-write-wins.
pub trait SessionStore: Send + Sync {
    /// Stored state, or a fresh empty state for a session seen the first time.
    fn load(&self, session_id: &SessionId) -> SessionState;
    fn save(&self, session_id: SessionId, state: SessionState);
    /// Destroy the session record (logout).
    fn remove(&self, session_id: &SessionId);
}

impl<S> SessionStore for Arc<S>
where
    S: SessionStore + ?Sized,
{
    fn load(&self, session_id: &SessionId) -> SessionState {
        (**self).load(session_id)
    }

    fn save(&self, session_id: SessionId, state: SessionState) {
        (**self).save(session_id, state)
    }

    fn remove(&self, session_id: &SessionId) {
        (**self).remove(session_id)
    }
}

/// In-memory session store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    inner: RwLock<HashMap<SessionId, SessionState>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, session_id: &SessionId) -> bool {
        self.inner
            .read()
            .map(|m| m.contains_key(session_id))
            .unwrap_or(false)
    }
}

impl SessionStore for InMemorySessionStore {
    fn load(&self, session_id: &SessionId) -> SessionState {
        self.inner
            .read()
            .ok()
            .and_then(|m| m.get(session_id).cloned())
            .unwrap_or_default()
    }

    fn save(&self, session_id: SessionId, state: SessionState) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(session_id, state);
        }
    }

    fn remove(&self, session_id: &SessionId) {
        if let Ok(mut map) = self.inner.write() {
            map.remove(session_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use spmi_auth::{Role, User, switch_active_role};
    use spmi_core::UserId;

    use super::*;

    #[test]
    fn sessions_are_isolated_and_removable() {
        let store = InMemorySessionStore::new();
        let user = User::new(UserId::new(), "Budi", vec![Role::new("auditor"), Role::new("auditee")]);
        let first = SessionId::new();
        let second = SessionId::new();

        let mut state = store.load(&first);
        switch_active_role(&user, &mut state, "auditor").unwrap();
        store.save(first, state);

        assert_eq!(store.load(&first).active_role().map(|r| r.as_str()), Some("auditor"));
        assert!(store.load(&second).active_role().is_none());
        assert!(!store.contains(&second));

        store.remove(&first);
        assert!(store.is_empty());
        assert!(store.load(&first).active_role().is_none());
    }
}
