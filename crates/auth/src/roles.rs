use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Reserved role name that satisfies every permission check.
pub const SUPERADMIN: &str = "superadmin";

/// Role identifier (e.g. "auditor", "auditee", "superadmin").
///
/// Roles are opaque names at this layer; which permissions a role carries is
/// answered by a [`crate::RoleGrants`] source.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub const fn superadmin() -> Self {
        Self(Cow::Borrowed(SUPERADMIN))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the wildcard role. Checked before any grant lookup.
    pub fn is_superadmin(&self) -> bool {
        self.as_str() == SUPERADMIN
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Role {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
