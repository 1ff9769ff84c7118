//! Route → permission table used to gate endpoints.

use std::collections::BTreeMap;

use crate::{Menu, Permission, ResourceAuthorization};

/// Required permission per route prefix.
///
/// Lookups pick the longest registered prefix that matches on a path-segment
/// boundary, so `/audits` guards `/audits/2024` but not `/auditsummary`.
/// Paths with no matching prefix are unguarded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutePolicy {
    rules: BTreeMap<String, Permission>,
}

/// The permission (if any) guarding one concrete path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardedRoute<'a> {
    pub path: &'a str,
    pub prefix: Option<&'a str>,
    pub permission: Option<&'a Permission>,
}

impl ResourceAuthorization for GuardedRoute<'_> {
    fn required_permission(&self) -> Option<&Permission> {
        self.permission
    }
}

impl RoutePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive rules from menu rows that carry both a route and a permission.
    pub fn from_menus(menus: &[Menu]) -> Self {
        let mut policy = Self::new();
        for menu in menus {
            if let (Some(route), Some(permission)) = (menu.route(), menu.required_permission()) {
                policy.insert(route, permission.clone());
            }
        }
        policy
    }

    /// Register `prefix`. A later rule for the same prefix replaces the earlier one.
    pub fn insert(&mut self, prefix: &str, permission: Permission) {
        let prefix = canonical_path(prefix);
        if let Some(previous) = self.rules.insert(prefix.clone(), permission.clone()) {
            if previous != permission {
                tracing::debug!(%prefix, %previous, %permission, "route rule replaced");
            }
        }
    }

    pub fn with_rule(mut self, prefix: &str, permission: impl Into<Permission>) -> Self {
        self.insert(prefix, permission.into());
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Resolve which rule guards `path`.
    pub fn guard<'a>(&'a self, path: &'a str) -> GuardedRoute<'a> {
        let hit = self.lookup(path);
        GuardedRoute {
            path,
            prefix: hit.map(|(prefix, _)| prefix),
            permission: hit.map(|(_, permission)| permission),
        }
    }

    pub fn required_for(&self, path: &str) -> Option<&Permission> {
        self.lookup(path).map(|(_, permission)| permission)
    }

    fn lookup(&self, path: &str) -> Option<(&str, &Permission)> {
        let normalized = canonical_path(path);
        self.rules
            .iter()
            .filter(|(prefix, _)| covers(prefix, &normalized))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(prefix, permission)| (prefix.as_str(), permission))
    }
}

/// Canonical form of a request path, as rules are matched against it.
///
/// Query and fragment are dropped, percent-escapes are decoded once, empty and
/// `.` segments are removed and `..` pops the previous segment. The result
/// always starts with `/` and has no trailing slash.
pub fn canonical_path(path: &str) -> String {
    let raw = path.split(['?', '#']).next().unwrap_or_default().trim();
    let decoded = urlencoding::decode_binary(raw.as_bytes());
    let decoded = String::from_utf8_lossy(&decoded);

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    format!("/{}", segments.join("/"))
}

fn covers(prefix: &str, path: &str) -> bool {
    if prefix == "/" {
        return true;
    }
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}
