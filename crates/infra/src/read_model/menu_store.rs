use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use spmi_auth::{Menu, RoutePolicy};
use spmi_core::MenuId;

/// Source of menu rows.
pub trait MenuStore: Send + Sync {
    /// Every menu row, in id order.
    fn all(&self) -> Vec<Menu>;
}

impl<S> MenuStore for Arc<S>
where
    S: MenuStore + ?Sized,
{
    fn all(&self) -> Vec<Menu> {
        (**self).all()
    }
}

/// In-memory menu table for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryMenuStore {
    inner: RwLock<BTreeMap<MenuId, Menu>>,
}

impl InMemoryMenuStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&self, menu: Menu) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(menu.id, menu);
        }
    }

    pub fn remove(&self, id: MenuId) {
        if let Ok(mut map) = self.inner.write() {
            map.remove(&id);
        }
    }

    /// Route rules derived from the current menu rows.
    pub fn route_policy(&self) -> RoutePolicy {
        RoutePolicy::from_menus(&self.all())
    }
}

impl MenuStore for InMemoryMenuStore {
    fn all(&self) -> Vec<Menu> {
        match self.inner.read() {
            Ok(map) => map.values().cloned().collect(),
            Err(_) => vec![],
        }
    }
}
