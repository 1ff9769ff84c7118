//! Authorization introspection for the active role.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
};

use spmi_auth::{ActiveRoleContext, Permission, explain_authorization};

use crate::app::{
    dto::{CheckRouteQuery, ExplainQuery},
    services::AppServices,
};
use crate::authz;

/// GET /authz/check?route=X - would the active role be allowed to open route X?
pub async fn check_route(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActiveRoleContext>,
    Query(query): Query<CheckRouteQuery>,
) -> axum::response::Response {
    let decision = authz::decide_route(&services, &ctx, &query.route);
    (StatusCode::OK, Json(decision)).into_response()
}

/// GET /authz/explain?permission=X - why the active role can/cannot use permission X
pub async fn explain(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActiveRoleContext>,
    Query(query): Query<ExplainQuery>,
) -> axum::response::Response {
    let required = Permission::optional(query.permission.as_deref());
    let explanation = explain_authorization(&*services.roles, &ctx, required.as_ref());

    (StatusCode::OK, Json(serde_json::json!({ "explanation": explanation }))).into_response()
}
