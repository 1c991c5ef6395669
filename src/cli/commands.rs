use crate::app::Application;
use crate::config::{load_config, ApplicationConfig, ConfigDiscovery, DEFAULT_CONFIG_PATTERN};
use crate::dispatcher::HandlerRegistry;
use crate::echo::echo_handler;
use crate::hot_reload::watch_config;
use crate::router::Router;
use crate::runtime_config::RuntimeConfig;
use crate::server::HttpServer;
use anyhow::Context as _;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Command-line interface for the glob router
#[derive(Parser)]
#[command(name = "globrouter")]
#[command(about = "Config-driven glob path router", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve an application file with the echo handler on every route
    Serve {
        /// Application file (YAML or TOML); searched for when omitted
        #[arg(short, long, env = "GLOBR_CONFIG")]
        config: Option<PathBuf>,

        /// Rebuild the router when the file changes
        #[arg(long, default_value_t = false)]
        watch: bool,

        /// Bind address, overriding the file's server section
        #[arg(long)]
        addr: Option<String>,
    },
    /// Print the resolution order and the route table
    Routes {
        #[arg(short, long, env = "GLOBR_CONFIG")]
        config: Option<PathBuf>,
    },
    /// Show where a request would be routed
    Resolve {
        #[arg(short, long, env = "GLOBR_CONFIG")]
        config: Option<PathBuf>,

        #[arg(short, long, default_value = "GET")]
        method: String,

        #[arg(short, long)]
        path: String,
    },
}

fn config_path(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(ConfigDiscovery::new().find(".", DEFAULT_CONFIG_PATTERN)?),
    }
}

/// A registry mapping every handler name in `config` to the echo handler.
#[must_use]
pub fn echo_registry(config: &ApplicationConfig) -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();
    for name in config.handler_names() {
        registry.register(name, echo_handler);
    }
    registry
}

fn echo_application(path: &Path, config: &ApplicationConfig) -> Application {
    let mut app = Application::new().with_config_file(path);
    for name in config.handler_names() {
        app.register_handler(name, echo_handler);
    }
    app
}

/// One-line description of how `router` resolves `method path`.
#[must_use]
pub fn resolve_report(router: &Router, method: &str, path: &str) -> String {
    match router.resolve_match(method, path) {
        Ok(matched) => {
            let mut line = format!(
                "{} {} -> {} (route {:?}, pattern {})",
                method,
                path,
                matched.handler_name(),
                matched.route.name,
                matched.pattern
            );
            for (name, value) in &matched.path_params {
                line.push_str(&format!(" {name}={value}"));
            }
            line
        }
        Err(e) => format!("{method} {path} -> {} {e}", e.status()),
    }
}

/// Execute a parsed command line.
///
/// # Errors
///
/// Config, router build and server failures.
pub fn run_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve {
            config,
            watch,
            addr,
        } => {
            let path = config_path(config.as_deref())?;
            let mut config = load_config(&path)?;
            if let Some(addr) = addr {
                let (host, port) = addr
                    .rsplit_once(':')
                    .with_context(|| format!("invalid --addr {addr:?}, expected host:port"))?;
                config.server.address = host.to_string();
                config.server.port = port
                    .parse()
                    .with_context(|| format!("invalid port in --addr {addr:?}"))?;
            }

            RuntimeConfig::from_env().apply();
            let app = echo_application(&path, &config);
            let service = app.service(&config)?;
            let _watcher = if watch {
                Some(watch_config(
                    &path,
                    app.handlers().clone(),
                    Arc::clone(&service.router),
                )?)
            } else {
                None
            };

            let bind = config.server.bind_address();
            let handle = HttpServer(service)
                .start(bind.as_str())
                .with_context(|| format!("failed to bind {bind}"))?;
            info!(config = %path.display(), addr = %bind, watch = watch, "Serving");
            handle
                .join()
                .map_err(|e| anyhow::anyhow!("server coroutine panicked: {e:?}"))
        }
        Commands::Routes { config } => {
            let path = config_path(config.as_deref())?;
            let config = load_config(&path)?;
            let router = crate::app::build_router(&config, &echo_registry(&config))?;
            router.dump_routes();
            Ok(())
        }
        Commands::Resolve {
            config,
            method,
            path: request_path,
        } => {
            let path = config_path(config.as_deref())?;
            let config = load_config(&path)?;
            let router = crate::app::build_router(&config, &echo_registry(&config))?;
            println!("{}", resolve_report(&router, &method, &request_path));
            Ok(())
        }
    }
}
