//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store wiring shared by middleware and handlers
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{
    Extension, Router,
    routing::{get, post},
};
use tower::ServiceBuilder;

use spmi_infra::MasterDataStores;

use crate::config::ApiConfig;
use crate::jwt::Hs256JwtValidator;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router from process configuration.
pub fn build_app(config: &ApiConfig) -> anyhow::Result<Router> {
    let data = config.master_data()?;
    let stores = MasterDataStores::load(&data)?;
    Ok(build_app_with(config.jwt_secret.clone(), &stores))
}

/// Build the router over already-populated stores.
pub fn build_app_with(jwt_secret: String, stores: &MasterDataStores) -> Router {
    let services = Arc::new(services::AppServices::from_stores(stores));
    let jwt = Arc::new(Hs256JwtValidator::new(jwt_secret.into_bytes()));
    let auth_state = middleware::AuthState {
        jwt,
        services: services.clone(),
    };

    // Identity only: reachable while a role still has to be chosen.
    let session_routes = Router::new()
        .route("/session", get(routes::session::show))
        .route("/session/role", post(routes::session::switch_role))
        .route("/session/logout", post(routes::session::logout));

    // Page routes additionally pass the per-route permission guard.
    let pages = Router::new()
        .route("/pages/*path", get(routes::pages::render))
        .route_layer(axum::middleware::from_fn_with_state(
            services.clone(),
            middleware::guard_route,
        ));

    // Everything below needs a resolved active role.
    let resolved = Router::new()
        .route("/menu", get(routes::menu::visible_menu))
        .route("/authz/check", get(routes::access::check_route))
        .route("/authz/explain", get(routes::access::explain))
        .merge(pages)
        .route_layer(axum::middleware::from_fn_with_state(
            services.clone(),
            middleware::require_active_role,
        ));

    let protected = session_routes
        .merge(resolved)
        .route_layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::authenticate,
        ))
        .layer(Extension(services));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
        .layer(ServiceBuilder::new())
}
