//! Store wiring shared by middleware and handlers.

use std::sync::Arc;

use spmi_auth::{
    ActiveRoleContext, AuthzError, MenuView, Resolution, Role, RoleGrants, RoutePolicy,
    SessionState, build_visible_menu_tree, resolve_active_role, switch_active_role,
};
use spmi_infra::{
    MasterDataStores,
    read_model::{MenuStore, SessionStore, UserDirectory},
};

use crate::context::SessionContext;

#[derive(Clone)]
pub struct AppServices {
    pub roles: Arc<dyn RoleGrants>,
    pub menus: Arc<dyn MenuStore>,
    pub users: Arc<dyn UserDirectory>,
    pub sessions: Arc<dyn SessionStore>,
}

impl AppServices {
    pub fn from_stores(stores: &MasterDataStores) -> Self {
        Self {
            roles: stores.roles.clone(),
            menus: stores.menus.clone(),
            users: stores.users.clone(),
            sessions: stores.sessions.clone(),
        }
    }

    /// Route rules as configured by the current menu rows.
    pub fn route_policy(&self) -> RoutePolicy {
        RoutePolicy::from_menus(&self.menus.all())
    }

    /// Run the resolver against the stored session and persist what it decided.
    pub fn resolve(&self, session: &SessionContext) -> Resolution {
        let loaded = self.sessions.load(&session.session_id());
        let mut state = loaded.clone();
        let resolution = resolve_active_role(session.user(), &mut state);
        self.persist_if_changed(session, &loaded, state);
        resolution
    }

    pub fn establish_active_role(
        &self,
        session: &SessionContext,
    ) -> Result<ActiveRoleContext, AuthzError> {
        let loaded = self.sessions.load(&session.session_id());
        self.establish_from(session, loaded)
    }

    fn establish_from(
        &self,
        session: &SessionContext,
        loaded: SessionState,
    ) -> Result<ActiveRoleContext, AuthzError> {
        let mut state = loaded.clone();
        let ctx = ActiveRoleContext::establish(session.user(), &mut state);
        self.persist_if_changed(session, &loaded, state);
        ctx
    }

    pub fn switch_role(&self, session: &SessionContext, requested: &str) -> Result<Role, AuthzError> {
        let mut state = self.sessions.load(&session.session_id());
        let role = switch_active_role(session.user(), &mut state, requested)?;
        self.sessions.save(session.session_id(), state);
        Ok(role)
    }

    pub fn logout(&self, session: &SessionContext) {
        tracing::info!(user_id = %session.user().id, session_id = %session.session_id(), "session ended");
        self.sessions.remove(&session.session_id());
    }

    pub fn visible_menu(&self, active_role: Option<&Role>) -> Vec<MenuView> {
        build_visible_menu_tree(&self.menus.all(), &*self.roles, active_role)
    }

    /// Write back only what the resolver itself changed (single-role default,
    /// stale role cleared). An unchanged read must not overwrite a switch that
    /// landed after it loaded.
    fn persist_if_changed(&self, session: &SessionContext, loaded: &SessionState, state: SessionState) {
        if &state != loaded {
            self.sessions.save(session.session_id(), state);
        }
    }
}
