use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use spmi_auth::{ActiveRoleContext, AuthzError, JwtValidator, canonical_path};

use crate::app::{errors, services::AppServices};
use crate::authz;
use crate::context::SessionContext;

/// Prefix under which rendered pages live; stripped before route checks.
pub const PAGES_PREFIX: &str = "/pages";

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<dyn JwtValidator>,
    pub services: Arc<AppServices>,
}

/// Authenticate the bearer token and attach the user's current assignments.
///
/// A user with no roles is logged out here: the session record is destroyed
/// and the request is refused.
pub async fn authenticate(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_bearer(req.headers())
        .map_err(|_| errors::json_error(StatusCode::UNAUTHORIZED, "unauthorized", "missing bearer token"))?;

    let claims = state
        .jwt
        .validate(token, Utc::now())
        .map_err(|e| errors::json_error(StatusCode::UNAUTHORIZED, "unauthorized", e.to_string()))?;

    let Some(user) = state.services.users.get(&claims.sub) else {
        return Err(errors::json_error(
            StatusCode::UNAUTHORIZED,
            "unknown_user",
            "account not found",
        ));
    };

    if user.roles().is_empty() {
        tracing::warn!(user_id = %user.id, session_id = %claims.sid, "forcing logout: no roles assigned");
        state.services.sessions.remove(&claims.sid);
        return Err(errors::authz_error_to_response(AuthzError::NoRolesAssigned));
    }

    req.extensions_mut()
        .insert(SessionContext::new(claims.sid, user));

    Ok(next.run(req).await)
}

/// Resolve the active role and attach it for the rest of the request.
///
/// Multi-role users without a selection are stopped with the list of roles
/// to choose from.
pub async fn require_active_role(
    State(services): State<Arc<AppServices>>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let Some(session) = req.extensions().get::<SessionContext>().cloned() else {
        return Err(errors::json_error(
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "no authenticated session",
        ));
    };

    let ctx = services
        .establish_active_role(&session)
        .map_err(errors::authz_error_to_response)?;

    req.extensions_mut().insert(ctx);
    Ok(next.run(req).await)
}

/// Gate page routes by the permission configured for them.
pub async fn guard_route(
    State(services): State<Arc<AppServices>>,
    req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let Some(ctx) = req.extensions().get::<ActiveRoleContext>() else {
        return Err(errors::json_error(
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "no active role",
        ));
    };

    let route = page_route(req.uri().path());
    authz::authorize_route(&services, ctx, &route).map_err(errors::authz_error_to_response)?;

    Ok(next.run(req).await)
}

/// The application route a `/pages/...` request addresses.
///
/// Both the guard and the page handler go through this, so the route that is
/// authorized is the route that is rendered.
pub fn page_route(request_path: &str) -> String {
    let path = request_path.strip_prefix(PAGES_PREFIX).unwrap_or(request_path);
    canonical_path(path)
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, StatusCode> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let header = header.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?;

    let header = header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn bearer_token_is_extracted() {
        let mut headers = HeaderMap::new();
        headers.insert(axum::http::header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def "));
        assert_eq!(extract_bearer(&headers), Ok("abc.def"));
    }

    #[test]
    fn page_route_is_canonical() {
        assert_eq!(page_route("/pages/%61udits"), "/audits");
        assert_eq!(page_route("/pages/audits//schedule/"), "/audits/schedule");
        assert_eq!(page_route("/pages"), "/");
    }

    #[test]
    fn missing_or_malformed_header_is_unauthorized() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_bearer(&headers), Err(StatusCode::UNAUTHORIZED));

        headers.insert(axum::http::header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(extract_bearer(&headers), Err(StatusCode::UNAUTHORIZED));

        headers.insert(axum::http::header::AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert_eq!(extract_bearer(&headers), Err(StatusCode::UNAUTHORIZED));
    }
}
