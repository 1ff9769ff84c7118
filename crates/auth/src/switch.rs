//! Role switch handler.

use crate::{AuthzError, Role, SessionState, User};

/// Make `requested` the session's active role.
///
/// Only roles assigned to `user` are accepted; on rejection the session is
/// left exactly as it was. Any assigned role may be entered from any state.
pub fn switch_active_role(
    user: &User,
    session: &mut SessionState,
    requested: &str,
) -> Result<Role, AuthzError> {
    let requested = requested.trim();
    let Some(role) = user.assigned_role(requested) else {
        tracing::info!(
            user_id = %user.id,
            requested_role = requested,
            "rejected switch to unassigned role"
        );
        return Err(AuthzError::InvalidRoleSwitchTarget(requested.to_string()));
    };

    let previous = session.active_role().map(|r| r.to_string());
    session.set_active_role(role.clone());
    tracing::info!(
        user_id = %user.id,
        from = previous.as_deref().unwrap_or("-"),
        to = %role,
        "active role switched"
    );
    Ok(role.clone())
}
