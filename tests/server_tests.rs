//! End-to-end tests: application file -> router -> `may_minihttp` server.
//!
//! Each test starts its own server on a free port through [`Application`],
//! sends raw HTTP/1.1 requests and stops the server on drop.

use globrouter::app::Application;
use globrouter::attributes::Attributes;
use globrouter::config::{load_config_str, ConfigFormat};
use globrouter::dispatcher::{Context, HandlerRequest};
use globrouter::echo::echo_handler;
use globrouter::router::{Route, Router, SharedRouter};
use globrouter::server::{AppService, ServerHandle};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, RwLock};

mod common;
use common::http::{get, send_request};
use common::test_server::{free_port, setup_may_runtime};

const APP: &str = r"
name: server-tests
routers:
  - { name: user, path: '/users/{id}', handler: users.Show, methods: [GET] }
  - { name: fail, path: /fail, handler: failing }
  - { name: panic, path: /panic, handler: panicking }
  - { name: greet, path: /greet, handler: greet, methods: [GET] }
  - { name: body, path: /body, handler: body, methods: [POST] }
  - { name: assets, path: /static/**, handler: users.Show, methods: [GET] }
attributes:
  greeting: hi
";

fn failing(_ctx: &mut Context<'_>) -> anyhow::Result<()> {
    anyhow::bail!("boom")
}

fn panicking(_ctx: &mut Context<'_>) -> anyhow::Result<()> {
    panic!("kaboom")
}

fn greet(ctx: &mut Context<'_>) -> anyhow::Result<()> {
    let greeting = ctx.attributes.get_string_trim("greeting");
    ctx.response.text(200, greeting);
    Ok(())
}

fn body(ctx: &mut Context<'_>) -> anyhow::Result<()> {
    let value: Value = ctx.request.json()?;
    ctx.response.json(201, json!({ "received": value }));
    Ok(())
}

/// Test fixture with automatic teardown.
struct TestServer {
    handle: Option<ServerHandle>,
    addr: SocketAddr,
}

impl TestServer {
    fn start() -> Self {
        setup_may_runtime();
        let mut config = load_config_str(APP, ConfigFormat::Yaml).unwrap();
        config.server.port = free_port();

        let mut app = Application::new();
        app.register_handler("users.Show", echo_handler)
            .register_handler("failing", failing)
            .register_handler("panicking", panicking)
            .register_handler("greet", greet)
            .register_handler("body", body);

        let handle = app.start(&config).unwrap();
        handle.wait_ready().unwrap();
        Self {
            addr: handle.addr(),
            handle: Some(handle),
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.stop();
        }
    }
}

#[test]
fn test_matched_route_reaches_handler() {
    let server = TestServer::start();
    let resp = get(&server.addr, "/users/42?verbose=1&tag=a%20b");
    assert_eq!(resp.status, 200);
    assert_eq!(resp.header("content-type"), Some("application/json"));

    let body = resp.json();
    assert_eq!(body["handler"], "users.Show");
    assert_eq!(body["route"], "user");
    assert_eq!(body["pattern"], "/users/{id}");
    assert_eq!(body["method"], "GET");
    assert_eq!(body["path"], "/users/42");
    assert_eq!(body["params"]["id"], "42");
    assert_eq!(body["query"]["verbose"], "1");
    assert_eq!(body["query"]["tag"], "a b");
}

#[test]
fn test_path_is_percent_decoded_before_routing() {
    let server = TestServer::start();
    let resp = get(&server.addr, "/users/jo%20e");
    assert_eq!(resp.status, 200);
    assert_eq!(resp.json()["params"]["id"], "jo e");

    // An encoded slash splits the segment, so `{id}` no longer matches.
    let resp = get(&server.addr, "/users/a%2Fb");
    assert_eq!(resp.status, 404);
    assert_eq!(resp.json()["path"], "/users/a/b");
}

#[test]
fn test_double_wildcard_route() {
    let server = TestServer::start();
    let resp = get(&server.addr, "/static/css/site.css");
    assert_eq!(resp.status, 200);
    assert_eq!(resp.json()["route"], "assets");
}

#[test]
fn test_wrong_method_is_405() {
    let server = TestServer::start();
    let resp = send_request(
        &server.addr,
        "DELETE /users/42 HTTP/1.1\r\nHost: localhost\r\n\r\n",
    );
    assert_eq!(resp.status, 405);
    let body = resp.json();
    assert_eq!(body["method"], "DELETE");
    assert_eq!(body["path"], "/users/42");
    assert!(body["error"].as_str().unwrap().contains("/users/{id}"));
}

#[test]
fn test_unmatched_path_is_404() {
    let server = TestServer::start();
    let resp = get(&server.addr, "/orders/1");
    assert_eq!(resp.status, 404);
    assert_eq!(resp.json()["path"], "/orders/1");
}

#[test]
fn test_handler_error_is_500() {
    let server = TestServer::start();
    let resp = get(&server.addr, "/fail");
    assert_eq!(resp.status, 500);
    let message = resp.json()["error"].as_str().unwrap().to_string();
    assert!(message.contains("failing"), "{message}");
    assert!(message.contains("boom"), "{message}");
}

#[test]
fn test_handler_panic_is_500_and_server_survives() {
    let server = TestServer::start();
    let resp = get(&server.addr, "/panic");
    assert_eq!(resp.status, 500);
    assert!(resp.json()["error"].as_str().unwrap().contains("kaboom"));

    let after = get(&server.addr, "/greet");
    assert_eq!(after.status, 200);
}

#[test]
fn test_text_response_uses_attributes() {
    let server = TestServer::start();
    let resp = get(&server.addr, "/greet");
    assert_eq!(resp.status, 200);
    assert!(resp.header("content-type").unwrap().starts_with("text/plain"));
    assert_eq!(resp.body, "hi");
}

#[test]
fn test_request_body_reaches_handler() {
    let server = TestServer::start();
    let payload = r#"{"name":"rex"}"#;
    let resp = send_request(
        &server.addr,
        &format!(
            "POST /body HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
            payload.len(),
            payload
        ),
    );
    assert_eq!(resp.status, 201);
    assert_eq!(resp.json()["received"]["name"], "rex");
}

#[test]
fn test_empty_router_answers_404() {
    let service = AppService::new(
        Arc::new(RwLock::new(Arc::new(Router::new()))),
        Arc::new(Attributes::new()),
    );
    let response = service.handle(&HandlerRequest::new("GET", "/anything"));
    assert_eq!(response.status, 404);
    assert_eq!(response.body["error"], "no routes registered");
    assert_eq!(response.body["method"], "GET");
}

#[test]
fn test_router_lock_is_free_while_handler_runs() {
    let shared: SharedRouter = Arc::new(RwLock::new(Arc::new(Router::new())));
    let lock = Arc::clone(&shared);
    let swapping = move |ctx: &mut Context<'_>| -> anyhow::Result<()> {
        // A reload landing mid-request must not wait for this handler.
        match lock.try_write() {
            Ok(mut router) => {
                *router = Arc::new(Router::new());
                ctx.response.text(200, "swapped");
            }
            Err(_) => {
                ctx.response.text(503, "locked");
            }
        }
        Ok(())
    };

    let mut router = Router::new();
    router.add(&Route::new("swap", "/swap", "swap"), Arc::new(swapping));
    *shared.write().unwrap() = Arc::new(router);

    let service = AppService::new(Arc::clone(&shared), Arc::new(Attributes::new()));
    let response = service.handle(&HandlerRequest::new("GET", "/swap"));
    assert_eq!(response.status, 200);
    assert_eq!(response.body, json!("swapped"));
    assert!(shared.read().unwrap().is_empty());
}

#[test]
fn test_router_swap_is_seen_by_service() {
    let mut config = load_config_str(APP, ConfigFormat::Yaml).unwrap();
    let mut app = Application::new();
    app.register_handler("users.Show", echo_handler)
        .register_handler("failing", failing)
        .register_handler("panicking", panicking)
        .register_handler("greet", greet)
        .register_handler("body", body);
    let service = app.service(&config).unwrap();

    let request = HandlerRequest::new("GET", "/greet");
    assert_eq!(service.handle(&request).status, 200);

    config.routers.retain(|r| r.name != "greet");
    *service.router.write().unwrap() = Arc::new(app.build_router(&config).unwrap());
    assert_eq!(service.handle(&request).status, 404);
}
