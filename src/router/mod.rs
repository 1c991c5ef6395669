//! # Router Module
//!
//! The router module maps an incoming request (method + path) to a registered
//! handler using glob-like path patterns.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Normalizing and compiling path patterns (`/users/{id}`, `/static/**`, `/*.json`)
//! - Keeping a route table keyed by `(normalized path, lowercased method)`
//! - Keeping the distinct patterns in a deterministic resolution order
//! - Resolving requests to handlers, or to a typed [`RouteError`]
//!
//! ## Architecture
//!
//! The router uses a two-phase approach:
//!
//! 1. **Registration**: At startup every configured [`Route`] is fed to
//!    [`Router::add`]. Patterns are normalized, compiled into [`Segment`]s and
//!    inserted into the [`PatternRegistry`], which keeps them sorted in
//!    descending lexicographic order.
//!
//! 2. **Resolution**: For each request [`Router::resolve`] walks the registry
//!    in that order. The first pattern that structurally matches the path
//!    decides: its route for the request method wins, or resolution fails
//!    with [`RouteError::HandlerNotFoundForMethod`].
//!
//! ## Example
//!
//! ```rust
//! use globrouter::dispatcher::{Context, Handler};
//! use globrouter::router::{Route, Router};
//! use std::sync::Arc;
//!
//! fn show_user(ctx: &mut Context<'_>) -> anyhow::Result<()> {
//!     let id = ctx.path_param("id").unwrap_or_default().to_string();
//!     ctx.response.text(200, id);
//!     Ok(())
//! }
//!
//! let mut router = Router::new();
//! let handler: Arc<dyn Handler> = Arc::new(show_user);
//! router.add(&Route::new("user", "/users/{id}", "show_user").with_methods(["GET"]), handler);
//!
//! let matched = router.resolve_match("GET", "/users/42").unwrap();
//! assert_eq!(matched.handler_name(), "show_user");
//! assert_eq!(matched.get_path_param("id"), Some("42"));
//! assert!(router.resolve("GET", "/users").is_err());
//! ```
//!
//! ## Performance
//!
//! Matching is a linear scan over the distinct patterns with no allocation
//! beyond the segment split and placeholder bindings:
//! O(number of distinct patterns × pattern length) per request.

mod core;
mod error;
mod pattern;
mod route;
mod table;

pub use core::{RouteMatch, Router, SharedRouter};
pub use error::RouteError;
pub use pattern::{normalize_path, ParamVec, Pattern, Segment, MAX_INLINE_PARAMS};
pub use route::{Route, DEFAULT_METHODS};
pub use table::{PatternRegistry, RouteKey, RouteTable};
