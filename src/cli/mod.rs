//! # CLI Module
//!
//! Command-line access to the router without writing any handler code.
//!
//! ## Commands
//!
//! ### `serve`
//!
//! Serve an application file, answering every route with the echo handler:
//!
//! ```bash
//! globrouter serve --config globrouter-application.yml --watch
//! ```
//!
//! Without `--config` the current directory is searched for
//! `globrouter-application.*`. `--watch` rebuilds the router when the file
//! changes. `--addr` overrides the file's `server` section.
//!
//! ### `routes`
//!
//! Print patterns in resolution order and every `(path, method)` entry:
//!
//! ```bash
//! globrouter routes --config globrouter-application.toml
//! ```
//!
//! ### `resolve`
//!
//! Show which handler a request would reach, or why it would not:
//!
//! ```bash
//! globrouter resolve --config app.yml --method POST --path /users/42
//! ```

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{echo_registry, resolve_report, run_cli, Cli, Commands};
