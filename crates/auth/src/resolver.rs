//! Active-role resolution.
//!
//! Decides, per request, which of a user's roles governs authorization.

use crate::{AuthzError, Role, SessionState, User};

/// Outcome of [`resolve_active_role`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A single role governs this request.
    Active(Role),
    /// The user holds several roles and has not picked one yet.
    RequiresSelection(Vec<Role>),
    /// The user has no roles; the session must be terminated.
    Rejected,
}

impl Resolution {
    pub fn active_role(&self) -> Option<&Role> {
        match self {
            Resolution::Active(role) => Some(role),
            _ => None,
        }
    }

    pub fn must_select(&self) -> bool {
        matches!(self, Resolution::RequiresSelection(_))
    }

    pub fn into_result(self) -> Result<Role, AuthzError> {
        match self {
            Resolution::Active(role) => Ok(role),
            Resolution::RequiresSelection(options) => {
                Err(AuthzError::RoleSelectionRequired { options })
            }
            Resolution::Rejected => Err(AuthzError::NoRolesAssigned),
        }
    }
}

/// Resolve the active role for `user`, updating `session` when a default is chosen.
///
/// - No roles: `Rejected`.
/// - Stored role still assigned: returned unchanged.
/// - Stored role revoked: cleared, then resolved as if nothing were stored.
/// - One role: selected and persisted.
/// - Several roles, nothing valid stored: `RequiresSelection`. No guessing.
pub fn resolve_active_role(user: &User, session: &mut SessionState) -> Resolution {
    if user.roles().is_empty() {
        tracing::warn!(user_id = %user.id, "user has no roles assigned; rejecting session");
        session.clear_active_role();
        return Resolution::Rejected;
    }

    if let Some(stored) = session.active_role() {
        if user.has_role(stored.as_str()) {
            return Resolution::Active(stored.clone());
        }

        tracing::warn!(
            user_id = %user.id,
            stale_role = %stored,
            "stored active role is no longer assigned; re-resolving"
        );
        session.clear_active_role();
    }

    match user.roles() {
        [only] => {
            session.set_active_role(only.clone());
            tracing::debug!(user_id = %user.id, role = %only, "defaulted to single assigned role");
            Resolution::Active(only.clone())
        }
        many => Resolution::RequiresSelection(many.to_vec()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use spmi_core::UserId;

    fn user(roles: &[&'static str]) -> User {
        User::new(UserId::new(), "Budi", roles.iter().map(|r| Role::new(*r)))
    }

    #[test]
    fn zero_roles_is_rejected() {
        let mut session = SessionState::new();
        let resolution = resolve_active_role(&user(&[]), &mut session);

        assert_eq!(resolution, Resolution::Rejected);
        assert_eq!(resolution.into_result(), Err(AuthzError::NoRolesAssigned));
        assert!(session.active_role().is_none());
    }

    #[test]
    fn zero_roles_also_clears_a_leftover_selection() {
        let mut session = SessionState::with_active_role("auditor");
        let resolution = resolve_active_role(&user(&[]), &mut session);

        assert_eq!(resolution, Resolution::Rejected);
        assert!(session.active_role().is_none());
    }

    #[test]
    fn single_role_is_selected_and_persisted() {
        let mut session = SessionState::new();
        let resolution = resolve_active_role(&user(&["auditee"]), &mut session);

        assert_eq!(resolution, Resolution::Active(Role::new("auditee")));
        assert_eq!(session.active_role().map(Role::as_str), Some("auditee"));
    }

    #[test]
    fn multiple_roles_without_selection_require_a_choice() {
        let mut session = SessionState::new();
        let resolution = resolve_active_role(&user(&["auditor", "auditee"]), &mut session);

        assert_eq!(
            resolution,
            Resolution::RequiresSelection(vec![Role::new("auditor"), Role::new("auditee")])
        );
        assert!(resolution.must_select());
        assert!(session.active_role().is_none());
    }

    #[test]
    fn stored_role_is_kept_even_when_it_is_not_the_first() {
        let mut session = SessionState::with_active_role("auditee");
        let resolution = resolve_active_role(&user(&["auditor", "auditee"]), &mut session);

        assert_eq!(resolution, Resolution::Active(Role::new("auditee")));
    }

    #[test]
    fn revoked_role_falls_back_to_the_remaining_single_role() {
        let mut session = SessionState::with_active_role("auditor");
        let resolution = resolve_active_role(&user(&["auditee"]), &mut session);

        assert_eq!(resolution, Resolution::Active(Role::new("auditee")));
        assert_eq!(session.active_role().map(Role::as_str), Some("auditee"));
    }

    #[test]
    fn revoked_role_with_several_left_asks_again() {
        let mut session = SessionState::with_active_role("superadmin");
        let resolution = resolve_active_role(&user(&["auditor", "auditee"]), &mut session);

        assert!(resolution.must_select());
        assert!(session.active_role().is_none());
    }

    proptest! {
        /// Resolving twice with a valid stored role never drifts.
        #[test]
        fn resolution_is_idempotent(
            roles in prop::collection::btree_set("[a-z]{1,8}", 1..6),
            pick in any::<prop::sample::Index>(),
        ) {
            let roles: Vec<Role> = roles.into_iter().map(Role::new).collect();
            let chosen = roles[pick.index(roles.len())].clone();
            let user = User::new(UserId::new(), "Budi", roles);
            let mut session = SessionState::with_active_role(chosen.clone());

            let first = resolve_active_role(&user, &mut session);
            let second = resolve_active_role(&user, &mut session);

            prop_assert_eq!(&first, &Resolution::Active(chosen));
            prop_assert_eq!(first, second);
        }
    }
}
