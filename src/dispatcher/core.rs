//! Dispatcher core module - handler invocation on the request path.

#![deny(clippy::inefficient_to_string)]
#![deny(clippy::format_push_string)]

use crate::attributes::Attributes;
use crate::ids::RequestId;
use crate::router::{ParamVec, RouteMatch, Router};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Maximum inline headers before heap allocation
pub const MAX_INLINE_HEADERS: usize = 16;

/// Stack-allocated header storage for the hot path.
///
/// Header names are lowercased when the request is parsed.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// Request data handed to a handler through its [`Context`].
#[derive(Debug, Clone, Default)]
pub struct HandlerRequest {
    /// Unique request ID for tracing and correlation
    pub request_id: RequestId,
    /// HTTP method as received
    pub method: String,
    /// Request path without query string
    pub path: String,
    /// Query string parameters
    pub query_params: ParamVec,
    /// HTTP headers (lowercase names)
    pub headers: HeaderVec,
    /// Raw request body
    pub body: Vec<u8>,
}

impl HandlerRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    /// Get a query parameter by name; the last occurrence wins.
    #[inline]
    #[must_use]
    pub fn get_query_param(&self, name: &str) -> Option<&str> {
        self.query_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get a header by name (case-insensitive per RFC 7230)
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Body as UTF-8, if it is valid UTF-8.
    #[must_use]
    pub fn body_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    /// Deserialize the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.body)
    }
}

/// The response sink a handler writes into.
///
/// A `Value::String` body is sent as `text/plain`; anything else is
/// serialized as JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandlerResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: Value,
}

impl Default for HandlerResponse {
    fn default() -> Self {
        Self {
            status: 200,
            body: Value::Null,
        }
    }
}

impl HandlerResponse {
    #[must_use]
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// Create an error response
    #[must_use]
    pub fn error(status: u16, message: &str) -> Self {
        Self::new(status, serde_json::json!({ "error": message }))
    }

    /// Replace the response with a plain-text body.
    pub fn text(&mut self, status: u16, body: impl Into<String>) -> &mut Self {
        self.status = status;
        self.body = Value::String(body.into());
        self
    }

    /// Replace the response with a JSON body.
    pub fn json(&mut self, status: u16, body: Value) -> &mut Self {
        self.status = status;
        self.body = body;
        self
    }

    #[must_use]
    pub fn is_text(&self) -> bool {
        self.body.is_string()
    }
}

/// Everything a handler receives for one invocation.
pub struct Context<'a> {
    /// The parsed request
    pub request: &'a HandlerRequest,
    /// Response sink; starts as `200` with a `null` body
    pub response: &'a mut HandlerResponse,
    /// The router that resolved this request
    pub router: &'a Router,
    /// The resolution result (route, pattern, placeholder bindings)
    pub matched: &'a RouteMatch,
    /// Application-level attributes, read-only while serving
    pub attributes: &'a Attributes,
}

impl<'a> Context<'a> {
    pub fn new(
        request: &'a HandlerRequest,
        response: &'a mut HandlerResponse,
        router: &'a Router,
        matched: &'a RouteMatch,
        attributes: &'a Attributes,
    ) -> Self {
        Self {
            request,
            response,
            router,
            matched,
            attributes,
        }
    }

    /// Value bound to placeholder `{name}` in the matched pattern.
    #[must_use]
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.matched.get_path_param(name)
    }

    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request.request_id
    }
}

/// A request handler capability.
///
/// Handlers are supplied by the application and referenced by name from
/// route descriptors. Returning `Err` makes the transport answer `500`.
///
/// Any `Fn(&mut Context<'_>) -> anyhow::Result<()>` is a handler:
///
/// ```rust
/// use globrouter::dispatcher::{Context, Handler};
///
/// fn hello(ctx: &mut Context<'_>) -> anyhow::Result<()> {
///     ctx.response.text(200, "hello");
///     Ok(())
/// }
///
/// fn assert_handler<H: Handler>(_: &H) {}
/// assert_handler(&hello);
/// ```
pub trait Handler: Send + Sync {
    fn handle(&self, ctx: &mut Context<'_>) -> anyhow::Result<()>;
}

impl<F> Handler for F
where
    F: Fn(&mut Context<'_>) -> anyhow::Result<()> + Send + Sync,
{
    fn handle(&self, ctx: &mut Context<'_>) -> anyhow::Result<()> {
        self(ctx)
    }
}

/// Handlers registered by name before routes are built.
///
/// Registering a name twice replaces the earlier handler.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn Handler>>,
}

impl HandlerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<H: Handler + 'static>(&mut self, name: &str, handler: H) {
        self.register_arc(name, Arc::new(handler));
    }

    pub fn register_arc(&mut self, name: &str, handler: Arc<dyn Handler>) {
        if self.handlers.insert(name.to_owned(), handler).is_some() {
            warn!(
                handler_name = %name,
                total_handlers = self.handlers.len(),
                "Replaced existing handler"
            );
        } else {
            info!(
                handler_name = %name,
                total_handlers = self.handlers.len(),
                "Handler registered successfully"
            );
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn Handler>> {
        self.handlers.get(name).map(Arc::clone)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.names())
            .finish()
    }
}

/// Invoke the matched handler and collect its response.
///
/// A handler error or panic becomes a `500` response; neither escapes
/// to the caller.
#[must_use]
pub fn dispatch(
    matched: &RouteMatch,
    request: &HandlerRequest,
    router: &Router,
    attributes: &Attributes,
) -> HandlerResponse {
    let mut response = HandlerResponse::default();
    let request_id = request.request_id;
    let handler_name = matched.handler_name();

    debug!(
        request_id = %request_id,
        handler_name = %handler_name,
        path_params = ?matched.path_params,
        query_params = ?request.query_params,
        "Handler execution start"
    );

    let start = Instant::now();
    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let mut ctx = Context::new(request, &mut response, router, matched, attributes);
        matched.handler.handle(&mut ctx)
    }));

    match outcome {
        Ok(Ok(())) => {
            info!(
                request_id = %request_id,
                handler_name = %handler_name,
                status = response.status,
                execution_time_us = start.elapsed().as_micros() as u64,
                "Handler execution complete"
            );
            response
        }
        Ok(Err(e)) => {
            warn!(
                request_id = %request_id,
                handler_name = %handler_name,
                error = %e,
                "Handler returned an error"
            );
            HandlerResponse::error(500, &format!("Handler '{handler_name}' failed: {e}"))
        }
        Err(panic) => {
            let panic_message = panic
                .downcast_ref::<&str>()
                .map(|s| (*s).to_owned())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_owned());
            error!(
                request_id = %request_id,
                handler_name = %handler_name,
                panic_message = %panic_message,
                "Handler panicked - CRITICAL"
            );
            HandlerResponse::error(500, &format!("Handler panicked: {panic_message}"))
        }
    }
}
