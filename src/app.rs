//! # Application
//!
//! Bootstrap glue: find and load the application file, check it against the
//! registered handlers, build the [`Router`] and serve it.
//!
//! ```rust,no_run
//! use globrouter::app::Application;
//! use globrouter::dispatcher::Context;
//!
//! fn hello(ctx: &mut Context<'_>) -> anyhow::Result<()> {
//!     ctx.response.text(200, "hello");
//!     Ok(())
//! }
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut app = Application::new();
//!     app.register_handler("x.HelloMux", hello);
//!     app.run()
//! }
//! ```

use crate::attributes::Attributes;
use crate::config::{load_config, ApplicationConfig, ConfigDiscovery, DEFAULT_CONFIG_PATTERN};
use crate::dispatcher::{Handler, HandlerRegistry};
use crate::router::Router;
use crate::runtime_config::RuntimeConfig;
use crate::server::{AppService, HttpServer, ServerHandle};
use anyhow::Context as _;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tracing::{error, info};

/// Reasons an application file cannot be turned into a router.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("no handlers registered")]
    NoHandlersRegistered,

    #[error("no routes configured")]
    NoRoutesConfigured,

    #[error("route {route:?} references unknown handler {handler:?}")]
    UnknownHandler { route: String, handler: String },
}

/// Build a router from `config`, resolving handler names in `registry`.
///
/// # Errors
///
/// See [`AppError`]. The first route with an unknown handler is reported.
pub fn build_router(config: &ApplicationConfig, registry: &HandlerRegistry) -> Result<Router, AppError> {
    if registry.is_empty() {
        return Err(AppError::NoHandlersRegistered);
    }
    if config.routers.is_empty() {
        return Err(AppError::NoRoutesConfigured);
    }

    let mut router = Router::new();
    for route in &config.routers {
        let handler = registry
            .get(&route.handler)
            .ok_or_else(|| AppError::UnknownHandler {
                route: route.name.clone(),
                handler: route.handler.clone(),
            })?;
        router.add(route, handler);
    }
    Ok(router)
}

/// Handlers, attributes and where to find the application file.
#[derive(Debug)]
pub struct Application {
    config_file: Option<PathBuf>,
    search_root: PathBuf,
    config_pattern: String,
    handlers: HandlerRegistry,
    attributes: Attributes,
}

impl Default for Application {
    fn default() -> Self {
        Self {
            config_file: None,
            search_root: PathBuf::from("."),
            config_pattern: DEFAULT_CONFIG_PATTERN.to_string(),
            handlers: HandlerRegistry::new(),
            attributes: Attributes::new(),
        }
    }
}

impl Application {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `path` instead of searching for the application file.
    #[must_use]
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Search under `root` for a file matching `pattern`.
    #[must_use]
    pub fn with_config_search(mut self, root: impl Into<PathBuf>, pattern: impl Into<String>) -> Self {
        self.search_root = root.into();
        self.config_pattern = pattern.into();
        self
    }

    pub fn register_handler<H: Handler + 'static>(&mut self, name: &str, handler: H) -> &mut Self {
        self.handlers.register(name, handler);
        self
    }

    #[must_use]
    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    #[must_use]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    /// Load the explicit config file, or the next one `discovery` finds.
    ///
    /// # Errors
    ///
    /// Discovery, read or parse failures.
    pub fn load_config(&self, discovery: &mut ConfigDiscovery) -> anyhow::Result<ApplicationConfig> {
        let path = match &self.config_file {
            Some(path) => path.clone(),
            None => discovery.find(&self.search_root, &self.config_pattern)?,
        };
        load_config(&path)
    }

    /// # Errors
    ///
    /// See [`build_router`].
    pub fn build_router(&self, config: &ApplicationConfig) -> Result<Router, AppError> {
        build_router(config, &self.handlers)
    }

    /// Service for `config`, with config attributes overlaid by the
    /// application's own.
    ///
    /// # Errors
    ///
    /// See [`build_router`].
    pub fn service(&self, config: &ApplicationConfig) -> Result<AppService, AppError> {
        let router = self.build_router(config)?;
        let mut attributes: Attributes = config
            .attributes
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        for (key, value) in self.attributes.iter() {
            attributes.put(key, value.clone());
        }
        Ok(AppService::new(
            Arc::new(RwLock::new(Arc::new(router))),
            Arc::new(attributes),
        ))
    }

    /// Build the router and start serving on `config.server`.
    ///
    /// # Errors
    ///
    /// Router build or bind failures.
    pub fn start(&self, config: &ApplicationConfig) -> anyhow::Result<ServerHandle> {
        let service = self.service(config)?;
        let addr = config.server.bind_address();
        let handle = HttpServer(service)
            .start(addr.as_str())
            .with_context(|| format!("failed to bind {addr}"))?;
        info!(
            name = %config.name,
            addr = %addr,
            routes = config.routers.len(),
            "Application started"
        );
        Ok(handle)
    }

    /// Configure the runtime, load the config, serve until the server stops.
    ///
    /// # Errors
    ///
    /// Any load, build or bind failure.
    pub fn run(&self) -> anyhow::Result<()> {
        RuntimeConfig::from_env().apply();
        let config = self.load_config(&mut ConfigDiscovery::new())?;
        let handle = self.start(&config)?;
        handle.join().map_err(|_| {
            error!("Server coroutine panicked");
            anyhow::anyhow!("server coroutine panicked")
        })
    }

    /// Explicit config file, if one was set.
    #[must_use]
    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }
}
