//! Menu authorization filter.
//!
//! Turns the flat menu table into the navigation forest a given active role
//! may see. Pure function of its inputs: no IO, no caching.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use spmi_core::MenuId;

use crate::{Permission, Role, RoleGrants, has_permission};

/// Deepest nesting the builder descends into. Real navigation is 2-3 levels;
/// anything deeper is malformed master data.
pub const MAX_MENU_DEPTH: usize = 16;

/// One row of the menu table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    pub id: MenuId,
    #[serde(default)]
    pub parent_id: Option<MenuId>,
    pub title: String,
    #[serde(default)]
    pub route: Option<String>,
    #[serde(default)]
    pub permission: Option<Permission>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub order: i32,
}

impl Menu {
    pub fn new(id: u64, parent_id: Option<u64>, title: impl Into<String>) -> Self {
        Self {
            id: MenuId::new(id),
            parent_id: parent_id.map(MenuId::new),
            title: title.into(),
            route: None,
            permission: None,
            icon: None,
            order: 0,
        }
    }

    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    pub fn with_permission(mut self, permission: impl Into<Permission>) -> Self {
        self.permission = Some(permission.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Route, if any; blank routes count as none.
    pub fn route(&self) -> Option<&str> {
        self.route.as_deref().map(str::trim).filter(|r| !r.is_empty())
    }

    /// Required permission, if any; blank permissions count as none.
    pub fn required_permission(&self) -> Option<&Permission> {
        self.permission.as_ref().filter(|p| !p.is_blank())
    }
}

/// A menu entry as shown to the user, with its visible children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuView {
    pub id: MenuId,
    pub title: String,
    pub route: Option<String>,
    pub icon: Option<String>,
    pub children: Vec<MenuView>,
}

impl MenuView {
    /// This node and all its descendants, in depth-first order.
    pub fn walk(&self) -> Vec<&MenuView> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.walk());
        }
        out
    }
}

/// Menus grouped by parent, each group in display order.
struct MenuIndex<'a> {
    by_parent: HashMap<Option<MenuId>, Vec<&'a Menu>>,
}

impl<'a> MenuIndex<'a> {
    fn new(menus: &'a [Menu]) -> Self {
        let mut by_parent: HashMap<Option<MenuId>, Vec<&'a Menu>> = HashMap::new();
        for menu in menus {
            by_parent.entry(menu.parent_id).or_default().push(menu);
        }
        for siblings in by_parent.values_mut() {
            siblings.sort_by_key(|m| (m.order, m.id));
        }
        Self { by_parent }
    }

    fn children_of(&self, parent: Option<MenuId>) -> &[&'a Menu] {
        self.by_parent
            .get(&parent)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

struct TreeBuilder<'a, G: ?Sized> {
    index: MenuIndex<'a>,
    grants: &'a G,
    role: &'a Role,
    visited: HashSet<MenuId>,
}

impl<G> TreeBuilder<'_, G>
where
    G: RoleGrants + ?Sized,
{
    fn is_allowed(&self, menu: &Menu) -> bool {
        if self.role.is_superadmin() {
            return true;
        }
        match menu.required_permission() {
            None => true,
            Some(permission) => has_permission(self.grants, self.role, permission),
        }
    }

    fn build_level(&mut self, parent: Option<MenuId>, depth: usize) -> Vec<MenuView> {
        if depth >= MAX_MENU_DEPTH {
            tracing::warn!(parent = ?parent, depth, "menu tree too deep; truncating");
            return Vec::new();
        }

        let siblings: Vec<&Menu> = self.index.children_of(parent).to_vec();
        let mut level = Vec::with_capacity(siblings.len());

        for menu in siblings {
            if !self.visited.insert(menu.id) {
                tracing::warn!(menu_id = %menu.id, "menu reached twice (cycle or duplicate id); skipping");
                continue;
            }

            // Children first, so an empty folder can be dropped afterwards.
            let children = self.build_level(Some(menu.id), depth + 1);

            if !self.is_allowed(menu) {
                continue;
            }
            if menu.route().is_none() && children.is_empty() {
                continue;
            }

            level.push(MenuView {
                id: menu.id,
                title: menu.title.clone(),
                route: menu.route().map(str::to_string),
                icon: menu.icon.clone(),
                children,
            });
        }

        level
    }
}

/// Build the navigation forest visible to `active_role`.
///
/// A node survives when the role may see it (superadmin, no required
/// permission, or a granted permission) and it is not an empty folder (no
/// route and no surviving children). Siblings keep their configured order.
/// Without an active role the forest is empty.
pub fn build_visible_menu_tree<G>(
    menus: &[Menu],
    grants: &G,
    active_role: Option<&Role>,
) -> Vec<MenuView>
where
    G: RoleGrants + ?Sized,
{
    let Some(role) = active_role else {
        return Vec::new();
    };

    let mut builder = TreeBuilder {
        index: MenuIndex::new(menus),
        grants,
        role,
        visited: HashSet::new(),
    };
    builder.build_level(None, 0)
}
