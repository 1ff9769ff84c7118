//! Session endpoints: role picker data, role switch, logout.
//!
//! These need an authenticated user but not a resolved role, so a multi-role
//! user can always reach them to make a choice.

use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::app::{
    dto::{SessionView, SwitchRoleRequest},
    errors,
    services::AppServices,
};
use crate::context::SessionContext;

/// GET /session - active role, selectable roles and whether a choice is pending
pub async fn show(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    let resolution = services.resolve(&session);
    let user = session.user();

    let view = SessionView {
        user_id: user.id.to_string(),
        name: user.name.clone(),
        active_role: resolution.active_role().map(|r| r.to_string()),
        roles: user.roles().iter().map(|r| r.to_string()).collect(),
        must_select_role: resolution.must_select(),
    };

    (StatusCode::OK, Json(view)).into_response()
}

/// POST /session/role - switch the active role for this session
pub async fn switch_role(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Json(req): Json<SwitchRoleRequest>,
) -> axum::response::Response {
    match services.switch_role(&session, &req.role) {
        Ok(role) => (
            StatusCode::OK,
            Json(json!({
                "active_role": role.as_str(),
                "roles": session.user().roles().iter().map(|r| r.as_str()).collect::<Vec<_>>(),
            })),
        )
            .into_response(),
        Err(e) => errors::authz_error_to_response(e),
    }
}

/// POST /session/logout - destroy the session record
pub async fn logout(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> StatusCode {
    services.logout(&session);
    StatusCode::NO_CONTENT
}
