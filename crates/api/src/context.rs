use spmi_auth::User;
use spmi_core::SessionId;

/// Authenticated session for a request (identity + current role assignments).
///
/// Present on every protected route. The active role, when resolved, is
/// carried separately as [`spmi_auth::ActiveRoleContext`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    session_id: SessionId,
    user: User,
}

impl SessionContext {
    pub fn new(session_id: SessionId, user: User) -> Self {
        Self { session_id, user }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn user(&self) -> &User {
        &self.user
    }
}
