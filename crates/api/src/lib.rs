//! HTTP API: session/role endpoints, menu rendering data and route guards.

pub mod app;
pub mod authz;
pub mod config;
pub mod context;
pub mod jwt;
pub mod middleware;
