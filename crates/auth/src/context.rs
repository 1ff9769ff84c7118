use serde::Serialize;

use spmi_core::UserId;

use crate::{AuthzError, Role, SessionState, User, resolve_active_role};

/// Per-request authorization context.
///
/// Built once per request after the active role has been resolved and passed
/// explicitly to the evaluator and the menu filter. It lives exactly as long
/// as the request that created it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveRoleContext {
    pub user_id: UserId,
    pub user_name: String,
    pub active_role: Role,
    pub available_roles: Vec<Role>,
}

impl ActiveRoleContext {
    /// Resolve the active role for `user` and capture it for this request.
    pub fn establish(user: &User, session: &mut SessionState) -> Result<Self, AuthzError> {
        let active_role = resolve_active_role(user, session).into_result()?;
        Ok(Self {
            user_id: user.id,
            user_name: user.name.clone(),
            active_role,
            available_roles: user.roles().to_vec(),
        })
    }

    pub fn is_superadmin(&self) -> bool {
        self.active_role.is_superadmin()
    }
}
