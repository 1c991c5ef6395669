use super::pattern::Pattern;
use super::route::Route;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Unique lookup key of the route table: normalized path plus lowercased method.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteKey {
    path: String,
    method: String,
}

impl RouteKey {
    /// `path` must already be normalized; `method` may be in any case.
    #[must_use]
    pub fn new(path: &str, method: &str) -> Self {
        Self {
            path: path.to_owned(),
            method: method.to_ascii_lowercase(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]:[{}]", self.path, self.method)
    }
}

/// Registered routes keyed by [`RouteKey`]. Last write wins.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: HashMap<RouteKey, Arc<Route>>,
}

impl RouteTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `route` under `key`, returning whatever it replaced.
    pub fn insert(&mut self, key: RouteKey, route: Arc<Route>) -> Option<Arc<Route>> {
        self.routes.insert(key, route)
    }

    #[must_use]
    pub fn get(&self, key: &RouteKey) -> Option<&Arc<Route>> {
        self.routes.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Entries sorted by key, for stable diagnostics output.
    #[must_use]
    pub fn sorted(&self) -> Vec<(&RouteKey, &Arc<Route>)> {
        let mut entries: Vec<_> = self.routes.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

/// Distinct normalized patterns, kept in resolution order.
///
/// Resolution order is descending lexicographic (byte-wise) order of the
/// normalized pattern text. The list is re-sorted whenever a new distinct
/// pattern arrives and is only read afterwards, so the order seen by
/// resolution depends only on the set of registered patterns.
#[derive(Debug, Clone, Default)]
pub struct PatternRegistry {
    seen: HashSet<String>,
    ordered: Vec<Arc<Pattern>>,
}

impl PatternRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `pattern` unless an identical normalized pattern is already known.
    ///
    /// Returns `true` if the pattern was new.
    pub fn insert(&mut self, pattern: Pattern) -> bool {
        if self.seen.contains(pattern.as_str()) {
            return false;
        }
        self.seen.insert(pattern.as_str().to_owned());
        self.ordered.push(Arc::new(pattern));
        self.ordered.sort_by(|a, b| b.as_str().cmp(a.as_str()));
        true
    }

    #[must_use]
    pub fn contains(&self, pattern: &str) -> bool {
        self.seen.contains(pattern)
    }

    /// Patterns in resolution order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Pattern>> {
        self.ordered.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}
