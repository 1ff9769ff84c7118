use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
    http::Uri,
    response::IntoResponse,
};

use spmi_auth::ActiveRoleContext;

use crate::app::{dto::PageView, services::AppServices};
use crate::middleware::page_route;

/// GET /pages/*path - page frame for an already-authorized route
///
/// Page bodies are rendered elsewhere; this returns the chrome every page
/// shares (active role, role picker options, navigation).
pub async fn render(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActiveRoleContext>,
    uri: Uri,
) -> impl IntoResponse {
    Json(PageView {
        route: page_route(uri.path()),
        user_name: ctx.user_name.clone(),
        active_role: ctx.active_role.to_string(),
        roles: ctx.available_roles.iter().map(|r| r.to_string()).collect(),
        menu: services.visible_menu(Some(&ctx.active_role)),
    })
}
