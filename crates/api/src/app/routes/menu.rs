use std::sync::Arc;

use axum::{Json, extract::Extension, response::IntoResponse};

use spmi_auth::ActiveRoleContext;

use crate::app::{dto::MenuResponse, services::AppServices};

/// GET /menu - navigation visible to the active role
pub async fn visible_menu(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActiveRoleContext>,
) -> impl IntoResponse {
    Json(MenuResponse {
        active_role: ctx.active_role.to_string(),
        menu: services.visible_menu(Some(&ctx.active_role)),
    })
}
