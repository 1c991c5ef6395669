//! # Config Module
//!
//! Application files describe the server address and the route table:
//!
//! ```yaml
//! name: demo
//! server:
//!   address: 0.0.0.0
//!   port: 9000
//! routers:
//!   - name: users
//!     path: /users/{id}
//!     handler: users.Show
//!     methods: [GET]
//!   - name: assets
//!     path: /static/**
//!     controller: assets.Serve
//! ```
//!
//! The same document can be written in TOML (`[[routers]]` tables). The
//! format is taken from the file suffix. `routers` may also be spelled
//! `request-mappings` or `handler-mappings`, `server.address` may be spelled
//! `host` or `host-name`, and a route's `handler` may be spelled `controller`.
//!
//! [`ConfigDiscovery`] finds the file by name pattern when no explicit path
//! is given.

mod discover;
mod error;
mod load;
mod types;

pub use discover::{compile_glob, ConfigDiscovery, DEFAULT_CONFIG_PATTERN};
pub use error::ConfigError;
pub use load::{load_config, load_config_str, ConfigFormat};
pub use types::{ApplicationConfig, ServerConfig, DEFAULT_ADDRESS, DEFAULT_PORT};
