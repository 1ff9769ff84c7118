use serde::Serialize;
use thiserror::Error;

use spmi_core::UserId;

use crate::{ActiveRoleContext, Permission, Role, RoleGrants};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("no roles are assigned to this account; contact an administrator")]
    NoRolesAssigned,

    #[error("select one of your roles to continue")]
    RoleSelectionRequired { options: Vec<Role> },

    #[error("access denied: role '{role}' lacks permission '{permission}'")]
    PermissionDenied { role: Role, permission: Permission },

    #[error("role '{0}' is not assigned to this account")]
    InvalidRoleSwitchTarget(String),
}

/// Resource-side authorization contract.
///
/// Implement this on anything that is gated by a permission (routes, actions).
/// `None` means the resource is open to every role-resolved user.
pub trait ResourceAuthorization {
    fn required_permission(&self) -> Option<&Permission>;
}

impl ResourceAuthorization for Option<Permission> {
    fn required_permission(&self) -> Option<&Permission> {
        self.as_ref()
    }
}

impl ResourceAuthorization for Permission {
    fn required_permission(&self) -> Option<&Permission> {
        Some(self)
    }
}

/// Does `role` grant `permission`?
///
/// - `superadmin` always does, whatever the id.
/// - Blank ids and unknown roles never do.
/// - Only the given role's grants count; other roles the user holds are ignored.
pub fn has_permission<G>(grants: &G, role: &Role, permission: &Permission) -> bool
where
    G: RoleGrants + ?Sized,
{
    if role.is_superadmin() {
        return true;
    }
    if permission.is_blank() {
        return false;
    }
    grants.grants(role, permission)
}

/// Gate a resource for the request's active role.
///
/// Unguarded resources are allowed. Denials are logged for audit.
pub fn authorize<G, R>(grants: &G, ctx: &ActiveRoleContext, resource: &R) -> Result<(), AuthzError>
where
    G: RoleGrants + ?Sized,
    R: ResourceAuthorization + ?Sized,
{
    let Some(required) = resource.required_permission() else {
        return Ok(());
    };

    if has_permission(grants, &ctx.active_role, required) {
        return Ok(());
    }

    tracing::warn!(
        user_id = %ctx.user_id,
        role = %ctx.active_role,
        permission = %required,
        "permission denied"
    );
    Err(AuthzError::PermissionDenied {
        role: ctx.active_role.clone(),
        permission: required.clone(),
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Authorization Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

/// Detailed explanation of an authorization decision.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationExplanation {
    /// The permission that was checked (`None` for unguarded resources).
    pub required_permission: Option<String>,

    pub granted: bool,

    /// Human-readable reason for the decision.
    pub reason: String,

    pub principal: PrincipalState,

    /// If denied, what was missing and how to fix it.
    pub denial_reason: Option<DenialReason>,
}

/// State of the user at decision time.
#[derive(Debug, Clone, Serialize)]
pub struct PrincipalState {
    pub user_id: UserId,
    pub active_role: String,
    pub available_roles: Vec<String>,
    /// Grants of the active role only.
    pub effective_permissions: Vec<String>,
    pub is_superadmin: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DenialReason {
    pub kind: DenialKind,
    pub message: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    UnknownRole,
    BlankPermission,
    MissingPermission,
}

/// Explain why an authorization decision was (or would be) made.
///
/// The decision is identical to [`authorize`]. The user's other roles are
/// consulted only to suggest a role switch; they never grant anything here.
pub fn explain_authorization<G>(
    grants: &G,
    ctx: &ActiveRoleContext,
    required: Option<&Permission>,
) -> AuthorizationExplanation
where
    G: RoleGrants + ?Sized,
{
    let role_perms = grants.permissions_of(&ctx.active_role);
    let principal = PrincipalState {
        user_id: ctx.user_id,
        active_role: ctx.active_role.to_string(),
        available_roles: ctx.available_roles.iter().map(|r| r.to_string()).collect(),
        effective_permissions: role_perms
            .iter()
            .flatten()
            .map(|p| p.to_string())
            .collect(),
        is_superadmin: ctx.is_superadmin(),
    };

    let Some(required) = required else {
        return AuthorizationExplanation {
            required_permission: None,
            granted: true,
            reason: "Resource has no required permission; open to every role".to_string(),
            principal,
            denial_reason: None,
        };
    };

    if ctx.is_superadmin() {
        return AuthorizationExplanation {
            required_permission: Some(required.to_string()),
            granted: true,
            reason: "Active role 'superadmin' bypasses all permission checks".to_string(),
            principal,
            denial_reason: None,
        };
    }

    if has_permission(grants, &ctx.active_role, required) {
        return AuthorizationExplanation {
            required_permission: Some(required.to_string()),
            granted: true,
            reason: format!(
                "Active role '{}' grants permission '{}'",
                ctx.active_role, required
            ),
            principal,
            denial_reason: None,
        };
    }

    let denial = if required.is_blank() {
        DenialReason {
            kind: DenialKind::BlankPermission,
            message: "Permission id is empty".to_string(),
            suggestions: vec!["Configure a non-empty permission for this resource".to_string()],
        }
    } else if role_perms.is_none() {
        DenialReason {
            kind: DenialKind::UnknownRole,
            message: format!("Role '{}' is not defined", ctx.active_role),
            suggestions: vec![format!(
                "Define role '{}' or remove it from the account",
                ctx.active_role
            )],
        }
    } else {
        let switch_targets: Vec<&Role> = ctx
            .available_roles
            .iter()
            .filter(|r| *r != &ctx.active_role)
            .filter(|r| has_permission(grants, r, required))
            .collect();

        let mut suggestions = Vec::new();
        for role in switch_targets {
            suggestions.push(format!(
                "Switch active role to '{}', which grants '{}'",
                role, required
            ));
        }
        suggestions.push(format!(
            "Ask an administrator to grant '{}' to role '{}'",
            required, ctx.active_role
        ));

        DenialReason {
            kind: DenialKind::MissingPermission,
            message: format!("Missing required permission: '{}'", required),
            suggestions,
        }
    };

    AuthorizationExplanation {
        required_permission: Some(required.to_string()),
        granted: false,
        reason: format!(
            "Active role '{}' does not grant permission '{}'",
            ctx.active_role, required
        ),
        principal,
        denial_reason: Some(denial),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, HashMap};

    use proptest::prelude::*;

    use super::*;

    fn grants() -> HashMap<Role, BTreeSet<Permission>> {
        let mut map = HashMap::new();
        map.insert(Role::new("auditee"), BTreeSet::new());
        map.insert(
            Role::new("auditor"),
            BTreeSet::from([Permission::new("audit.schedule"), Permission::new("finding.create")]),
        );
        map
    }

    fn ctx(active: &'static str, roles: &[&'static str]) -> ActiveRoleContext {
        ActiveRoleContext {
            user_id: UserId::new(),
            user_name: "Budi".to_string(),
            active_role: Role::new(active),
            available_roles: roles.iter().map(|r| Role::new(*r)).collect(),
        }
    }

    #[test]
    fn granted_permission_is_allowed() {
        assert!(has_permission(&grants(), &Role::new("auditor"), &Permission::new("audit.schedule")));
    }

    #[test]
    fn unknown_role_fails_closed() {
        assert!(!has_permission(&grants(), &Role::new("dean"), &Permission::new("audit.schedule")));
    }

    #[test]
    fn blank_permission_fails_closed() {
        assert!(!has_permission(&grants(), &Role::new("auditor"), &Permission::new("")));
        assert!(!has_permission(&grants(), &Role::new("auditor"), &Permission::new("  ")));
    }

    #[test]
    fn only_the_active_role_counts() {
        // Budi holds both roles; with "auditee" active the auditor grant is not visible.
        let ctx = ctx("auditee", &["auditor", "auditee"]);
        let err = authorize(&grants(), &ctx, &Permission::new("audit.schedule")).unwrap_err();
        assert_eq!(
            err,
            AuthzError::PermissionDenied {
                role: Role::new("auditee"),
                permission: Permission::new("audit.schedule"),
            }
        );
        assert!(err.to_string().contains("'auditee'"));
    }

    #[test]
    fn unguarded_resource_is_open() {
        let ctx = ctx("auditee", &["auditee"]);
        assert!(authorize(&grants(), &ctx, &None::<Permission>).is_ok());
    }

    #[test]
    fn explain_suggests_switching_to_a_granting_role() {
        let ctx = ctx("auditee", &["auditor", "auditee"]);
        let required = Permission::new("finding.create");
        let explanation = explain_authorization(&grants(), &ctx, Some(&required));

        assert!(!explanation.granted);
        assert!(explanation.principal.effective_permissions.is_empty());
        let denial = explanation.denial_reason.unwrap();
        assert_eq!(denial.kind, DenialKind::MissingPermission);
        assert!(denial.suggestions[0].contains("'auditor'"));
    }

    #[test]
    fn explain_reports_unknown_roles() {
        let ctx = ctx("dean", &["dean"]);
        let explanation = explain_authorization(&grants(), &ctx, Some(&Permission::new("x")));
        assert_eq!(explanation.denial_reason.unwrap().kind, DenialKind::UnknownRole);
    }

    #[test]
    fn explain_superadmin_is_granted() {
        let ctx = ctx("superadmin", &["superadmin"]);
        let explanation = explain_authorization(&grants(), &ctx, Some(&Permission::new("anything")));
        assert!(explanation.granted);
        assert!(explanation.principal.is_superadmin);
        assert!(explanation.denial_reason.is_none());
    }

    proptest! {
        /// superadmin passes every id, including ids no role has ever been granted.
        #[test]
        fn superadmin_bypasses_every_permission(id in ".*") {
            let empty: HashMap<Role, BTreeSet<Permission>> = HashMap::new();
            prop_assert!(has_permission(&empty, &Role::superadmin(), &Permission::new(id.clone())));
            prop_assert!(has_permission(&grants(), &Role::superadmin(), &Permission::new(id)));
        }

        /// A role without a grant never borrows it from another role.
        #[test]
        fn no_cross_role_union(perm in "[a-z]{1,12}\\.[a-z]{1,12}") {
            let mut map = HashMap::new();
            map.insert(Role::new("r1"), BTreeSet::new());
            map.insert(Role::new("r2"), BTreeSet::from([Permission::new(perm.clone())]));

            prop_assert!(!has_permission(&map, &Role::new("r1"), &Permission::new(perm.clone())));
            prop_assert!(has_permission(&map, &Role::new("r2"), &Permission::new(perm)));
        }
    }
}
