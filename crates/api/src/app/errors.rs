use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use spmi_auth::AuthzError;

pub fn authz_error_to_response(err: AuthzError) -> axum::response::Response {
    match err {
        AuthzError::NoRolesAssigned => {
            json_error(StatusCode::UNAUTHORIZED, "no_roles_assigned", err.to_string())
        }
        AuthzError::RoleSelectionRequired { ref options } => (
            StatusCode::PRECONDITION_REQUIRED,
            axum::Json(json!({
                "error": "role_selection_required",
                "message": err.to_string(),
                "options": options.iter().map(|r| r.as_str()).collect::<Vec<_>>(),
            })),
        )
            .into_response(),
        AuthzError::PermissionDenied { .. } => {
            json_error(StatusCode::FORBIDDEN, "permission_denied", err.to_string())
        }
        AuthzError::InvalidRoleSwitchTarget(_) => json_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "invalid_role_switch_target",
            err.to_string(),
        ),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
