//! Router behaviour driven through application files.

use globrouter::app::build_router;
use globrouter::config::{load_config_str, ConfigFormat};
use globrouter::dispatcher::{Context, HandlerRegistry};
use globrouter::router::{Pattern, RouteError, Router};

fn ok(_ctx: &mut Context<'_>) -> anyhow::Result<()> {
    Ok(())
}

fn router_from(yaml: &str) -> Router {
    let config = load_config_str(yaml, ConfigFormat::Yaml).unwrap();
    let mut registry = HandlerRegistry::new();
    for name in config.handler_names() {
        registry.register(name, ok);
    }
    build_router(&config, &registry).unwrap()
}

fn handler(router: &Router, method: &str, path: &str) -> Result<String, RouteError> {
    router
        .resolve_match(method, path)
        .map(|m| m.handler_name().to_string())
}

#[test]
fn test_hello_route() {
    let router = router_from(
        "routers:\n  - { name: hello, path: /hello/*, handler: x.HelloMux, methods: [GET] }\n",
    );
    assert_eq!(handler(&router, "GET", "/hello/world").unwrap(), "x.HelloMux");
    assert_eq!(handler(&router, "get", "/hello/x").unwrap(), "x.HelloMux");
    assert_eq!(handler(&router, "POST", "/hello/world").unwrap_err().status(), 405);
    assert_eq!(handler(&router, "GET", "/hello").unwrap_err().status(), 404);
}

#[test]
fn test_catch_all_shadows_nothing_more_specific() {
    let router = router_from(
        r"
routers:
  - { path: /*, handler: fallback }
  - { path: /api/users, handler: users }
  - { path: /api/**, handler: api }
",
    );
    assert_eq!(
        router.patterns().collect::<Vec<_>>(),
        vec!["/api/users", "/api/**", "/*"]
    );
    assert_eq!(handler(&router, "GET", "/api/users").unwrap(), "users");
    assert_eq!(handler(&router, "GET", "/api/orders/1").unwrap(), "api");
    assert_eq!(handler(&router, "GET", "/elsewhere").unwrap(), "fallback");
}

#[test]
fn test_method_specific_shadowing() {
    // The higher-ranked pattern matches first and has no GET: no fallback.
    let router = router_from(
        r"
routers:
  - { path: /*, handler: fallback }
  - { path: /upload/**, handler: upload, methods: [PUT] }
",
    );
    assert_eq!(handler(&router, "PUT", "/upload/a/b").unwrap(), "upload");
    assert!(matches!(
        handler(&router, "GET", "/upload/a/b"),
        Err(RouteError::HandlerNotFoundForMethod { .. })
    ));
}

#[test]
fn test_unnormalized_config_paths() {
    let router = router_from("routers:\n  - { path: '/a//b/../c/', handler: h }\n");
    assert_eq!(router.patterns().collect::<Vec<_>>(), vec!["/a/c"]);
    assert!(router.resolve("GET", "/a/c").is_ok());
}

#[test]
fn test_pattern_public_api() {
    let pattern = Pattern::parse("/files/{dir}/*.txt");
    assert_eq!(pattern.placeholder_names().collect::<Vec<_>>(), vec!["dir"]);
    let params = pattern.matches("/files/docs/readme.txt").unwrap();
    assert_eq!(params[0].1, "docs");
    assert!(!pattern.is_match("/files/docs/readme.md"));
}

#[test]
fn test_dump_routes_does_not_panic() {
    let router = router_from("routers:\n  - { path: /x, handler: h, methods: [GET] }\n");
    router.dump_routes();
    assert_eq!(router.routes()[0].0.to_string(), "[/x]:[get]");
}
