use crate::router::Route;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;

/// Listen address of the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    #[serde(alias = "host", alias = "host-name")]
    pub address: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// `address:port`, suitable for binding.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

/// Contents of an application file.
///
/// ```yaml
/// name: demo
/// server: { address: 127.0.0.1, port: 8080 }
/// routers:
///   - { name: hello, path: /hello/*, handler: x.HelloMux, methods: [GET] }
/// attributes:
///   greeting: hi
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default, alias = "request-mappings", alias = "handler-mappings")]
    pub routers: Vec<Route>,

    /// Seed values for the application's attribute store.
    #[serde(default)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl ApplicationConfig {
    /// Distinct handler names referenced by the routes, sorted.
    #[must_use]
    pub fn handler_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.routers.iter().map(|r| r.handler.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}
