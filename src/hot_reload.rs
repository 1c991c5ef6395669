//! # Hot Reload
//!
//! Rebuild the router when the application file changes, without restarting
//! the server.
//!
//! ```rust,no_run
//! use globrouter::hot_reload::watch_config;
//! # use globrouter::dispatcher::HandlerRegistry;
//! # use globrouter::router::Router;
//! # use std::sync::{Arc, RwLock};
//! # let registry = HandlerRegistry::new();
//! # let router = Arc::new(RwLock::new(Arc::new(Router::new())));
//!
//! // Keep the watcher alive for as long as reloads are wanted.
//! let _watcher = watch_config("globrouter-application.yml", registry, router)?;
//! # Ok::<(), notify::Error>(())
//! ```
//!
//! A file that fails to load, or whose routes reference unknown handlers, is
//! logged and ignored. The previous router stays active.
//!
//! Only routes are reloaded. A changed `server` section needs a restart.

use crate::app::build_router;
use crate::config::load_config;
use crate::dispatcher::HandlerRegistry;
use crate::router::{Router, SharedRouter};
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{error, info, warn};

/// Reload `path` into a fresh router and swap it into `router`.
///
/// Requests already dispatched keep the router they resolved against.
/// Returns whether the swap happened.
pub fn reload_router(
    path: &Path,
    registry: &HandlerRegistry,
    router: &RwLock<Arc<Router>>,
) -> bool {
    let config = match load_config(path) {
        Ok(config) => config,
        Err(e) => {
            warn!(path = %path.display(), error = %format!("{e:#}"), "hot-reload: config rejected");
            return false;
        }
    };
    let new_router = match build_router(&config, registry) {
        Ok(r) => r,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "hot-reload: routes rejected");
            return false;
        }
    };

    let patterns = new_router.patterns().count();
    let routes = new_router.route_count();
    *router.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(new_router);
    info!(
        path = %path.display(),
        patterns = patterns,
        routes = routes,
        "hot-reload: router replaced"
    );
    true
}

/// Watch `config_path` and rebuild the router on every change.
///
/// Handler names are resolved against `registry`, which is fixed for the
/// life of the watcher.
///
/// # Errors
///
/// Returns the `notify` error if the watcher cannot be created or the file
/// cannot be watched.
pub fn watch_config<P>(
    config_path: P,
    registry: HandlerRegistry,
    router: SharedRouter,
) -> notify::Result<RecommendedWatcher>
where
    P: AsRef<Path>,
{
    let path: PathBuf = config_path.as_ref().to_path_buf();
    let watch_path = path.clone();

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                    reload_router(&watch_path, &registry, &router);
                }
            }
            Err(e) => error!(error = %e, "hot-reload: watch error"),
        },
        Config::default(),
    )?;

    watcher.watch(&path, RecursiveMode::NonRecursive)?;
    info!(path = %path.display(), "hot-reload: watching config file");
    Ok(watcher)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::Context;
    use std::io::Write;

    fn ok(_ctx: &mut Context<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    #[test]
    fn test_invalid_reload_keeps_previous_router() {
        let mut registry = HandlerRegistry::new();
        registry.register("h", ok);

        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(file, "routers:\n  - {{ name: a, path: /a, handler: h }}").unwrap();

        let router = RwLock::new(Arc::new(Router::new()));
        assert!(reload_router(file.path(), &registry, &router));
        assert!(router.read().unwrap().resolve("GET", "/a").is_ok());

        let mut broken = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(broken, "routers:\n  - {{ name: b, path: /b, handler: nope }}").unwrap();
        assert!(!reload_router(broken.path(), &registry, &router));
        assert!(router.read().unwrap().resolve("GET", "/a").is_ok());
    }
}
