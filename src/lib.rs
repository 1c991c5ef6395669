//! # globrouter
//!
//! **globrouter** is a config-driven HTTP request router for Rust. Routes are declared in a
//! YAML or TOML application file, matched with glob-like path patterns, and served on the
//! `may` coroutine runtime through `may_minihttp`.
//!
//! ## Overview
//!
//! An application registers named handlers in code. The application file maps path
//! patterns and methods to those names. At startup every route is compiled into the
//! [`router::Router`]; each request is then resolved to a handler and dispatched.
//!
//! ## Architecture
//!
//! - **[`router`]** - Pattern compilation, route table and request resolution
//! - **[`dispatcher`]** - Handler trait, handler registry and panic-safe dispatch
//! - **[`config`]** - Application file model, YAML/TOML loading and file discovery
//! - **[`app`]** - Bootstrap: load, validate against handlers, build, serve
//! - **[`server`]** - HTTP transport built on `may_minihttp`
//! - **[`hot_reload`]** - Rebuild the router when the application file changes
//! - **[`attributes`]** - Typed dynamic key/value storage shared with handlers
//! - **[`logging`]** - `tracing` subscriber setup
//! - **[`cli`]** - The `globrouter` command line
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Client
//!     participant Server as HttpServer<br/>(may_minihttp)
//!     participant Service as AppService
//!     participant Router as Router
//!     participant Handler as Handler
//!
//!     Client->>Server: GET /users/42?verbose=1
//!     Server->>Service: call(req, res)
//!     Service->>Service: Split path and query,<br/>collect headers and body
//!     Service->>Router: resolve_match("GET", "/users/42")
//!     Router->>Router: Walk patterns in<br/>descending order
//!
//!     alt Router empty
//!         Router-->>Client: 404 NoRoutesRegistered
//!     else No pattern matches
//!         Router-->>Client: 404 NoMatchingRoute
//!     else First match has no GET route
//!         Router-->>Client: 405 HandlerNotFoundForMethod
//!     end
//!
//!     Router-->>Service: RouteMatch {route, pattern, id=42}
//!     Service->>Handler: handle(&mut Context)
//!     alt Err or panic
//!         Handler-->>Client: 500 {"error": ...}
//!     end
//!     Handler-->>Service: HandlerResponse
//!     Service-->>Client: 200 text/plain or application/json
//! ```
//!
//! ## Path Patterns
//!
//! | Segment | Matches |
//! |---|---|
//! | `users` | exactly `users` |
//! | `*` | any single segment |
//! | `{id}` | any single segment, bound as `id` |
//! | `*.json` | any single segment ending in `.json` |
//! | `**` | one or more segments, see below |
//!
//! The pattern `/*` on its own matches every path.
//!
//! `**` matches greedily with a one-segment look-ahead and no backtracking.
//! It succeeds as soon as it reaches the last path segment, even when pattern
//! segments follow it: `/api/**/detail` matches `/api/x/detail` and also
//! `/api/x/y`. A path needs at least as many segments as the pattern.
//!
//! ## Quick Start
//!
//! ```rust
//! use globrouter::app::build_router;
//! use globrouter::config::{load_config_str, ConfigFormat};
//! use globrouter::dispatcher::{Context, HandlerRegistry};
//!
//! fn hello(ctx: &mut Context<'_>) -> anyhow::Result<()> {
//!     ctx.response.text(200, "hello");
//!     Ok(())
//! }
//!
//! let config = load_config_str(
//!     "routers:\n  - { name: hello, path: /hello/*, handler: x.HelloMux, methods: [GET] }\n",
//!     ConfigFormat::Yaml,
//! )?;
//! let mut handlers = HandlerRegistry::new();
//! handlers.register("x.HelloMux", hello);
//!
//! let router = build_router(&config, &handlers)?;
//! assert!(router.resolve("GET", "/hello/world").is_ok());
//! assert_eq!(router.resolve_match("POST", "/hello/world").unwrap_err().status(), 405);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Environment
//!
//! - `GLOBR_STACK_SIZE` - coroutine stack size, see [`runtime_config`]
//! - `GLOBR_LOG_*` - log level, format and sampling, see [`logging`]

pub mod app;
pub mod attributes;
pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod echo;
pub mod hot_reload;
pub mod ids;
pub mod logging;
pub mod router;
pub mod runtime_config;
pub mod server;

pub use app::{build_router, AppError, Application};
pub use attributes::{AttributeError, Attributes};
pub use config::{load_config, ApplicationConfig, ConfigDiscovery};
pub use dispatcher::{Context, Handler, HandlerRegistry};
pub use router::{Route, RouteError, Router};
