//! Router core module - route registration and the request hot path.

#![deny(clippy::inefficient_to_string)]
#![deny(clippy::format_push_string)]
#![deny(clippy::unnecessary_to_owned)]

use super::error::RouteError;
use super::pattern::{ParamVec, Pattern};
use super::route::Route;
use super::table::{PatternRegistry, RouteKey, RouteTable};
use crate::dispatcher::Handler;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

/// A router that can be replaced while requests are being served.
///
/// Readers clone the inner `Arc` and release the lock before dispatching, so
/// a running handler never blocks a swap.
pub type SharedRouter = Arc<RwLock<Arc<Router>>>;

/// Result of successfully resolving a request to a handler.
#[derive(Clone)]
pub struct RouteMatch {
    /// The stored route descriptor (normalized path)
    pub route: Arc<Route>,
    /// The pattern that matched the request path
    pub pattern: Arc<Pattern>,
    /// Route table key the route was found under
    pub key: RouteKey,
    /// Handler registered under `route.handler`
    pub handler: Arc<dyn Handler>,
    /// Placeholder bindings, e.g. `{id}` -> `("id", "42")`
    pub path_params: ParamVec,
}

impl RouteMatch {
    /// Name of the handler that should process this request.
    #[must_use]
    pub fn handler_name(&self) -> &str {
        &self.route.handler
    }

    /// Get a bound placeholder by name.
    ///
    /// If a name appears twice in a pattern the last binding wins.
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Debug for RouteMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteMatch")
            .field("route", &self.route)
            .field("pattern", &self.pattern.as_str())
            .field("key", &self.key)
            .field("path_params", &self.path_params)
            .finish_non_exhaustive()
    }
}

/// Maps `(method, path)` to a registered handler.
///
/// Routes are added during a registration phase and the router is only read
/// afterwards. `Router` has no internal locking: share it as a
/// [`SharedRouter`] if routes must change while requests are served
/// (see [`crate::hot_reload`]).
///
/// # Resolution
///
/// Distinct patterns are tried in descending lexicographic order of their
/// normalized text. The first pattern that structurally matches the path
/// decides the outcome: if it has no route for the request method the
/// resolution fails, even when a later pattern would have matched that
/// method.
#[derive(Clone, Default)]
pub struct Router {
    table: RouteTable,
    patterns: PatternRegistry,
    handlers: HashMap<String, Arc<dyn Handler>>,
}

impl Router {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `route` and make `handler` available under `route.handler`.
    ///
    /// - An empty method list means every method in
    ///   [`DEFAULT_METHODS`](super::DEFAULT_METHODS).
    /// - The path is normalized before use; the stored route carries the
    ///   normalized path.
    /// - A `(path, method)` pair registered twice keeps the last route.
    /// - A handler name registered twice keeps the last handler.
    ///
    /// Patterns are not validated. One that can never match is accepted and
    /// simply never resolves.
    pub fn add(&mut self, route: &Route, handler: Arc<dyn Handler>) {
        let pattern = Pattern::parse(&route.path);
        let stored = Arc::new(Route {
            path: pattern.as_str().to_owned(),
            ..route.clone()
        });

        let methods = stored.effective_methods();
        for method in &methods {
            let key = RouteKey::new(pattern.as_str(), method);
            if let Some(previous) = self.table.insert(key, Arc::clone(&stored)) {
                debug!(
                    pattern = %pattern,
                    method = %method,
                    previous_route = %previous.name,
                    route = %stored.name,
                    "Route overwritten"
                );
            }
        }

        let pattern_text = pattern.to_string();
        let new_pattern = self.patterns.insert(pattern);

        if self.handlers.insert(stored.handler.clone(), handler).is_some() {
            debug!(handler_name = %stored.handler, "Handler replaced");
        }

        info!(
            route = %stored.name,
            pattern = %pattern_text,
            handler_name = %stored.handler,
            methods = ?methods,
            new_pattern = new_pattern,
            patterns_count = self.patterns.len(),
            "Route registered"
        );
    }

    /// Resolve a request to its handler.
    ///
    /// `method` may be in any case; `path` is the absolute request path
    /// without query string.
    ///
    /// # Errors
    ///
    /// See [`RouteError`].
    pub fn resolve(&self, method: &str, path: &str) -> Result<Arc<dyn Handler>, RouteError> {
        self.resolve_match(method, path).map(|m| m.handler)
    }

    /// Like [`Router::resolve`] but returns the full [`RouteMatch`].
    ///
    /// # Errors
    ///
    /// See [`RouteError`].
    pub fn resolve_match(&self, method: &str, path: &str) -> Result<RouteMatch, RouteError> {
        if self.patterns.is_empty() {
            return Err(RouteError::NoRoutesRegistered);
        }

        let method = method.to_ascii_lowercase();
        for pattern in self.patterns.iter() {
            let Some(path_params) = pattern.matches(path) else {
                continue;
            };

            let key = RouteKey::new(pattern.as_str(), &method);
            let found = self.table.get(&key).and_then(|route| {
                self.handlers
                    .get(&route.handler)
                    .map(|handler| (Arc::clone(route), Arc::clone(handler)))
            });

            // First structural match decides; no further patterns are tried.
            let Some((route, handler)) = found else {
                return Err(RouteError::HandlerNotFoundForMethod {
                    method,
                    path: path.to_owned(),
                    pattern: pattern.as_str().to_owned(),
                });
            };

            debug!(
                method = %method,
                path = %path,
                pattern = %pattern,
                handler_name = %route.handler,
                path_params = ?path_params,
                "Route matched"
            );

            return Ok(RouteMatch {
                route,
                pattern: Arc::clone(pattern),
                key,
                handler,
                path_params,
            });
        }

        Err(RouteError::NoMatchingRoute {
            method,
            path: path.to_owned(),
        })
    }

    /// Handler registered under `name`, if any.
    #[must_use]
    pub fn handler(&self, name: &str) -> Option<Arc<dyn Handler>> {
        self.handlers.get(name).map(Arc::clone)
    }

    /// Normalized patterns in resolution order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|p| p.as_str())
    }

    /// Registered routes sorted by key.
    #[must_use]
    pub fn routes(&self) -> Vec<(&RouteKey, &Arc<Route>)> {
        self.table.sorted()
    }

    /// Number of `(pattern, method)` entries.
    #[must_use]
    pub fn route_count(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Print the resolution order and every route to stdout.
    pub fn dump_routes(&self) {
        println!(
            "[routes] patterns={} entries={}",
            self.patterns.len(),
            self.table.len()
        );
        for (rank, pattern) in self.patterns().enumerate() {
            println!("[pattern] #{rank} {pattern}");
        }
        for (key, route) in self.routes() {
            println!("[route] {key} -> {}", route.handler);
        }
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut handlers: Vec<&String> = self.handlers.keys().collect();
        handlers.sort();
        f.debug_struct("Router")
            .field("patterns", &self.patterns().collect::<Vec<_>>())
            .field("routes", &self.table.len())
            .field("handlers", &handlers)
            .finish()
    }
}
