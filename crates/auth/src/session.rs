use serde::{Deserialize, Serialize};

use crate::Role;

/// Authorization state stored with one authenticated session.
///
/// The active role is written only by the resolver (single-role default) and
/// the role switch handler; everything else reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    active_role: Option<Role>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_role(&self) -> Option<&Role> {
        self.active_role.as_ref()
    }

    pub(crate) fn set_active_role(&mut self, role: Role) {
        self.active_role = Some(role);
    }

    pub(crate) fn clear_active_role(&mut self) {
        self.active_role = None;
    }
}

#[cfg(test)]
impl SessionState {
    pub(crate) fn with_active_role(role: impl Into<Role>) -> Self {
        Self {
            active_role: Some(role.into()),
        }
    }
}
