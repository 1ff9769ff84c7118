//! `spmi-auth`: role resolution, permission evaluation and menu authorization.
//!
//! Pure decision logic: no HTTP, no storage. Callers pass in the user, the
//! session record and a [`RoleGrants`] source, and persist whatever session
//! changes come back.

pub mod authorize;
pub mod claims;
pub mod context;
pub mod grants;
pub mod menu;
pub mod permissions;
pub mod resolver;
pub mod roles;
pub mod route;
pub mod session;
pub mod switch;
pub mod user;

pub use authorize::{
    AuthorizationExplanation, AuthzError, DenialKind, DenialReason, PrincipalState,
    ResourceAuthorization, authorize, explain_authorization, has_permission,
};
pub use claims::{JwtValidator, SessionClaims, TokenValidationError, validate_claims};
pub use context::ActiveRoleContext;
pub use grants::RoleGrants;
pub use menu::{MAX_MENU_DEPTH, Menu, MenuView, build_visible_menu_tree};
pub use permissions::Permission;
pub use resolver::{Resolution, resolve_active_role};
pub use roles::{Role, SUPERADMIN};
pub use route::{GuardedRoute, RoutePolicy, canonical_path};
pub use session::SessionState;
pub use switch::switch_active_role;
pub use user::User;
