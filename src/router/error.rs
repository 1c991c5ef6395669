use thiserror::Error;

/// Why [`Router::resolve`](super::Router::resolve) produced no handler.
///
/// The router returns these to its caller and never writes a response
/// itself; the transport decides how each maps onto the wire.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// Nothing was ever added to the router
    #[error("no routes registered")]
    NoRoutesRegistered,

    /// No registered pattern structurally matches the path
    #[error("no route matches {method} {path}")]
    NoMatchingRoute { method: String, path: String },

    /// The first matching pattern has no route, or no handler, for the method
    #[error("pattern {pattern} matches {path} but has no handler for {method}")]
    HandlerNotFoundForMethod {
        method: String,
        path: String,
        pattern: String,
    },
}

impl RouteError {
    /// HTTP status the transport answers with.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            RouteError::NoRoutesRegistered | RouteError::NoMatchingRoute { .. } => 404,
            RouteError::HandlerNotFoundForMethod { .. } => 405,
        }
    }
}
