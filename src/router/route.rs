use http::Method;
use serde::{Deserialize, Serialize};

/// Methods a route applies to when its descriptor lists none.
pub const DEFAULT_METHODS: [Method; 8] = [
    Method::GET,
    Method::HEAD,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
    Method::OPTIONS,
    Method::TRACE,
];

/// A route descriptor: a path pattern bound to a named handler for a set of methods.
///
/// This is the shape read from the application file and handed to
/// [`Router::add`](super::Router::add). Once stored in a router the `path`
/// is always in normalized form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Route {
    /// Informational route name
    #[serde(default)]
    pub name: String,
    /// Path pattern, e.g. `/users/{id}` or `/static/**`
    pub path: String,
    /// Name the handler was registered under
    #[serde(alias = "controller")]
    pub handler: String,
    /// HTTP methods; empty means every method in [`DEFAULT_METHODS`]
    #[serde(default)]
    pub methods: Vec<String>,
}

impl Route {
    pub fn new(name: impl Into<String>, path: impl Into<String>, handler: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            handler: handler.into(),
            methods: Vec::new(),
        }
    }

    /// Builder-style method list.
    #[must_use]
    pub fn with_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.methods = methods.into_iter().map(Into::into).collect();
        self
    }

    /// Lowercased methods this route applies to, with the empty list expanded.
    #[must_use]
    pub fn effective_methods(&self) -> Vec<String> {
        if self.methods.is_empty() {
            DEFAULT_METHODS
                .iter()
                .map(|m| m.as_str().to_ascii_lowercase())
                .collect()
        } else {
            self.methods.iter().map(|m| m.to_ascii_lowercase()).collect()
        }
    }
}
