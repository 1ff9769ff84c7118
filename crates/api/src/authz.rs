//! API-side route authorization.
//!
//! Route rules come from the menu master data, so a page is gated by the same
//! permission that gates its menu entry.

use serde::Serialize;

use spmi_auth::{ActiveRoleContext, AuthzError, authorize, canonical_path};

use crate::app::services::AppServices;

/// Allow/deny outcome for one route.
#[derive(Debug, Clone, Serialize)]
pub struct RouteDecision {
    pub route: String,
    pub allowed: bool,
    pub required_permission: Option<String>,
    pub reason: String,
}

/// Check `route` for the request's active role.
pub fn authorize_route(
    services: &AppServices,
    ctx: &ActiveRoleContext,
    route: &str,
) -> Result<(), AuthzError> {
    let policy = services.route_policy();
    let guarded = policy.guard(route);
    authorize(&*services.roles, ctx, &guarded)
}

/// Same decision as [`authorize_route`], reported instead of enforced.
pub fn decide_route(services: &AppServices, ctx: &ActiveRoleContext, route: &str) -> RouteDecision {
    let policy = services.route_policy();
    let required_permission = policy.required_for(route).map(|p| p.to_string());
    let canonical = canonical_path(route);

    match authorize_route(services, ctx, route) {
        Ok(()) => RouteDecision {
            route: canonical,
            allowed: true,
            reason: match &required_permission {
                None => "route is not guarded".to_string(),
                Some(p) => format!("role '{}' may use '{}'", ctx.active_role, p),
            },
            required_permission,
        },
        Err(err) => RouteDecision {
            route: canonical,
            allowed: false,
            required_permission,
            reason: err.to_string(),
        },
    }
}
