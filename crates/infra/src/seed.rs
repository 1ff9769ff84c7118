//! Master-data seeding from JSON.
//!
//! Roles, menus and users are managed by administrative CRUD elsewhere; this
//! loads a snapshot of them into the in-memory stores.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use spmi_auth::{Menu, Permission, Role, User};
use spmi_core::{DomainError, UserId};

use crate::read_model::{
    InMemoryMenuStore, InMemoryRoleStore, InMemorySessionStore, InMemoryUserDirectory,
};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read master data from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid master data JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid master data: {0}")]
    Invalid(#[from] DomainError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRecord {
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Snapshot of the authorization master data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterData {
    #[serde(default)]
    pub roles: Vec<RoleRecord>,
    #[serde(default)]
    pub menus: Vec<Menu>,
    #[serde(default)]
    pub users: Vec<UserRecord>,
}

impl MasterData {
    pub fn from_json(raw: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Built-in master data for local development.
    pub fn demo() -> Self {
        let role = |name: &str, perms: &[&str]| RoleRecord {
            name: name.to_string(),
            permissions: perms.iter().map(|p| p.to_string()).collect(),
        };
        let user = |id: u128, name: &str, roles: &[&str]| UserRecord {
            id: Uuid::from_u128(id),
            name: name.to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
        };

        MasterData {
            roles: vec![
                role("superadmin", &[]),
                role(
                    "admin",
                    &["master.manage", "audit.read", "audit.schedule", "document.read", "document.write"],
                ),
                role("auditor", &["audit.read", "finding.read", "finding.create", "document.read"]),
                role("auditee", &["finding.read", "finding.correct", "document.read", "document.write"]),
            ],
            menus: vec![
                Menu::new(1, None, "Dashboard").with_route("/dashboard").with_icon("home").with_order(1),
                Menu::new(2, None, "Master Data").with_icon("database").with_order(2),
                Menu::new(3, Some(2), "Departments")
                    .with_route("/master/departments")
                    .with_permission("master.manage")
                    .with_order(1),
                Menu::new(4, Some(2), "Standards")
                    .with_route("/master/standards")
                    .with_permission("master.manage")
                    .with_order(2),
                Menu::new(5, Some(2), "Indicators")
                    .with_route("/master/indicators")
                    .with_permission("master.manage")
                    .with_order(3),
                Menu::new(6, None, "Audit").with_icon("clipboard").with_order(3),
                Menu::new(7, Some(6), "Schedule")
                    .with_route("/audits/schedule")
                    .with_permission("audit.schedule")
                    .with_order(1),
                Menu::new(8, Some(6), "Audits")
                    .with_route("/audits")
                    .with_permission("audit.read")
                    .with_order(2),
                Menu::new(9, Some(6), "Findings")
                    .with_route("/findings")
                    .with_permission("finding.read")
                    .with_order(3),
                Menu::new(10, None, "Documents")
                    .with_route("/documents")
                    .with_permission("document.read")
                    .with_icon("folder")
                    .with_order(4),
            ],
            users: vec![
                user(1, "Admin", &["superadmin"]),
                user(2, "Budi", &["auditor", "auditee"]),
                user(3, "Sari", &["auditee"]),
            ],
        }
    }
}

/// The in-memory stores populated from one [`MasterData`] snapshot.
#[derive(Debug, Clone)]
pub struct MasterDataStores {
    pub roles: Arc<InMemoryRoleStore>,
    pub menus: Arc<InMemoryMenuStore>,
    pub users: Arc<InMemoryUserDirectory>,
    pub sessions: Arc<InMemorySessionStore>,
}

impl MasterDataStores {
    pub fn empty() -> Self {
        Self {
            roles: Arc::new(InMemoryRoleStore::new()),
            menus: Arc::new(InMemoryMenuStore::new()),
            users: Arc::new(InMemoryUserDirectory::new()),
            sessions: Arc::new(InMemorySessionStore::new()),
        }
    }

    /// Validate `data` and load it into fresh stores.
    pub fn load(data: &MasterData) -> Result<Self, SeedError> {
        let users = data
            .users
            .iter()
            .map(|u| {
                User::try_new(
                    UserId::from_uuid(u.id),
                    u.name.clone(),
                    u.roles.iter().map(|r| Role::new(r.trim().to_string())),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut role_names = HashSet::new();
        for record in &data.roles {
            let name = record.name.trim();
            if name.is_empty() {
                return Err(DomainError::validation("role name cannot be empty").into());
            }
            if !role_names.insert(name) {
                return Err(DomainError::duplicate("role", name).into());
            }
        }

        let mut menu_ids = HashSet::new();
        for menu in &data.menus {
            if !menu_ids.insert(menu.id) {
                return Err(DomainError::duplicate("menu id", menu.id).into());
            }
        }

        let mut user_ids = HashSet::new();
        for user in &users {
            if !user_ids.insert(user.id) {
                return Err(DomainError::duplicate("user", user.id).into());
            }
        }

        let stores = Self::empty();
        for record in &data.roles {
            stores.roles.define(
                Role::new(record.name.trim().to_string()),
                record.permissions.iter().map(|p| Permission::new(p.trim().to_string())),
            );
        }
        for menu in &data.menus {
            stores.menus.upsert(menu.clone());
        }
        for user in users {
            if user.roles().is_empty() {
                tracing::warn!(user_id = %user.id, name = %user.name, "user has no roles and will not be able to sign in");
            }
            stores.users.upsert(user);
        }

        tracing::info!(
            roles = data.roles.len(),
            menus = data.menus.len(),
            users = data.users.len(),
            "master data loaded"
        );
        Ok(stores)
    }
}
