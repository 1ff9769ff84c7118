use serde::{Deserialize, Serialize};

use spmi_auth::MenuView;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct SwitchRoleRequest {
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct CheckRouteQuery {
    pub route: String,
}

#[derive(Debug, Deserialize)]
pub struct ExplainQuery {
    pub permission: Option<String>,
}

// -------------------------
// Response DTOs
// -------------------------

/// What the page chrome needs to render the role picker.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub user_id: String,
    pub name: String,
    pub active_role: Option<String>,
    pub roles: Vec<String>,
    pub must_select_role: bool,
}

#[derive(Debug, Serialize)]
pub struct MenuResponse {
    pub active_role: String,
    pub menu: Vec<MenuView>,
}

/// Data for one server-rendered page frame.
#[derive(Debug, Serialize)]
pub struct PageView {
    pub route: String,
    pub user_name: String,
    pub active_role: String,
    pub roles: Vec<String>,
    pub menu: Vec<MenuView>,
}
