use crate::cli::{echo_registry, resolve_report, Cli, Commands};
use crate::config::{load_config_str, ConfigFormat};
use clap::Parser;

const APP: &str = r"
routers:
  - { name: user, path: '/users/{id}', handler: users.Show, methods: [GET] }
  - { name: users, path: /users/*, handler: users.Any }
";

#[test]
fn test_serve_command_flags() {
    let cli = Cli::try_parse_from([
        "globrouter",
        "serve",
        "--config",
        "app.yml",
        "--watch",
        "--addr",
        "0.0.0.0:9000",
    ])
    .unwrap();

    match cli.command {
        Commands::Serve {
            config,
            watch,
            addr,
        } => {
            assert_eq!(config.unwrap().to_string_lossy(), "app.yml");
            assert!(watch);
            assert_eq!(addr.as_deref(), Some("0.0.0.0:9000"));
        }
        _ => panic!("Expected Serve command"),
    }
}

#[test]
fn test_resolve_command_defaults_to_get() {
    let cli = Cli::try_parse_from(["globrouter", "resolve", "-c", "app.yml", "--path", "/x"]).unwrap();
    match cli.command {
        Commands::Resolve { method, path, .. } => {
            assert_eq!(method, "GET");
            assert_eq!(path, "/x");
        }
        _ => panic!("Expected Resolve command"),
    }
}

#[test]
fn test_resolve_requires_path() {
    assert!(Cli::try_parse_from(["globrouter", "resolve", "-c", "app.yml"]).is_err());
}

#[test]
fn test_echo_registry_covers_every_handler() {
    let config = load_config_str(APP, ConfigFormat::Yaml).unwrap();
    let registry = echo_registry(&config);
    assert_eq!(registry.names(), vec!["users.Any", "users.Show"]);
}

#[test]
fn test_resolve_report() {
    let config = load_config_str(APP, ConfigFormat::Yaml).unwrap();
    let router = crate::app::build_router(&config, &echo_registry(&config)).unwrap();

    // "/users/{id}" sorts above "/users/*" in descending order, so it is tried first.
    let hit = resolve_report(&router, "GET", "/users/7");
    assert_eq!(
        hit,
        "GET /users/7 -> users.Show (route \"user\", pattern /users/{id}) id=7"
    );

    let miss = resolve_report(&router, "POST", "/users/7");
    assert!(miss.starts_with("POST /users/7 -> 405"), "{miss}");

    let none = resolve_report(&router, "GET", "/orders");
    assert!(none.starts_with("GET /orders -> 404"), "{none}");
}
